use std::sync::{LazyLock, RwLock};

pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

/// Defaults shared by the model and the curation helpers
#[derive(Clone, Debug)]
pub struct Configuration {
    pub lower_bound: f64,
    pub upper_bound: f64,
    /// Compartment holding the metabolites exchanged with the environment
    pub external_compartment: String,
    /// Compartment reactions are relocated into
    pub cytoplasm: String,
    /// Compartments kept when removing shuttles or relocating reactions
    pub allowed_compartments: Vec<String>,
    /// Compartment suffixes understood when canonicalizing reaction ids
    pub recognized_compartments: Vec<String>,
    pub exchange_prefix: String,
    /// Uptake flux used for media entries which don't specify one
    pub default_medium_flux: f64,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            lower_bound: -1000.,
            upper_bound: 1000.,
            external_compartment: "e".to_string(),
            cytoplasm: "c".to_string(),
            allowed_compartments: vec!["c".to_string(), "e".to_string(), "p".to_string()],
            recognized_compartments: vec![
                "c".to_string(),
                "h".to_string(),
                "m".to_string(),
                "x".to_string(),
            ],
            exchange_prefix: "EX_".to_string(),
            default_medium_flux: 10.,
        }
    }
}
