//! This module provides the metabolite struct representing a metabolite

use derive_builder::Builder;

use crate::chemistry::formula::{classify_exchange, parse_formula, ElementCounts, ExchangeClass};

/// Represents a metabolite
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Metabolite {
    /// Used to identify the metabolite (must be unique)
    pub id: String,
    /// Human Readable name of the metabolite
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Which compartment the metabolite is in
    #[builder(default = "None")]
    pub compartment: Option<String>,
    /// Electrical charge of the Metabolite
    #[builder(default = "0")]
    pub charge: i32,
    /// Chemical Formula of the metabolite
    #[builder(default = "None")]
    pub formula: Option<String>,
    /// Notes about the metabolite
    #[builder(default = "None")]
    pub notes: Option<String>,
    /// Metabolite annotations
    #[builder(default = "None")]
    pub annotation: Option<String>,
}

impl Metabolite {
    /// Create a metabolite with only an id and a compartment set
    pub fn new(id: &str, compartment: &str) -> Self {
        Metabolite {
            id: id.to_string(),
            name: None,
            compartment: Some(compartment.to_string()),
            charge: 0,
            formula: None,
            notes: None,
            annotation: None,
        }
    }

    /// Element counts of the formula, empty if the metabolite has no formula
    pub fn elements(&self) -> ElementCounts {
        self.formula
            .as_deref()
            .map(parse_formula)
            .unwrap_or_default()
    }

    /// Whether the metabolite is organic, inorganic, or lacks the formula to tell
    pub fn exchange_class(&self) -> ExchangeClass {
        classify_exchange(self.formula.as_deref())
    }
}
