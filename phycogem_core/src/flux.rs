//! Relabeling of flux values so that they can be drawn on pathway maps which use compartment-free
//! reaction ids.
use std::collections::HashMap;

use indexmap::IndexMap;

use crate::identifiers::canonicalize_ids;

/// Rename flux values using [`canonicalize_ids`], then the `rename` table
///
/// When several reactions end up with the same label only the first value is kept.
///
/// # Examples
/// ```rust
/// use std::collections::HashMap;
/// use indexmap::IndexMap;
/// use phycogem_core::flux::relabel_fluxes;
/// let mut fluxes = IndexMap::new();
/// fluxes.insert("PGK_c".to_string(), -12.5);
/// fluxes.insert("PGK_h".to_string(), 3.0);
/// let relabeled = relabel_fluxes(&fluxes, &HashMap::new());
/// assert_eq!(relabeled["PGK"], -12.5);
/// assert_eq!(relabeled["PGK_h"], 3.0);
/// ```
pub fn relabel_fluxes(
    fluxes: &IndexMap<String, f64>,
    rename: &HashMap<String, String>,
) -> IndexMap<String, f64> {
    let ids: Vec<&str> = fluxes.keys().map(String::as_str).collect();
    let labels = canonicalize_ids(&ids, rename);
    let mut relabeled = IndexMap::new();
    for (id, flux) in fluxes {
        let label = labels.get(id).cloned().unwrap_or_else(|| id.clone());
        relabeled.entry(label).or_insert(*flux);
    }
    relabeled
}
