//! Helpers for compartment suffixed identifiers, such as "glc__D_c" or "PFK_m"
use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;
use log::debug;

use crate::configuration::CONFIGURATION;

/// Remove a single letter compartment suffix ("_c", "_e", ...) from an id
///
/// Ids without such a suffix are returned unchanged.
pub fn remove_compartment(id: &str) -> &str {
    match id.rsplit_once('_') {
        Some((base, tag)) if is_compartment_tag(tag) => base,
        _ => id,
    }
}

/// Replace the compartment suffix of an id, or append one if the id has none
///
/// # Examples
/// ```rust
/// use phycogem_core::identifiers::with_compartment;
/// assert_eq!(with_compartment("atp_m", "c"), "atp_c");
/// assert_eq!(with_compartment("atp", "c"), "atp_c");
/// ```
pub fn with_compartment(id: &str, compartment: &str) -> String {
    format!("{}_{}", remove_compartment(id), compartment)
}

/// Split an id into its base and compartment, if it ends in one of the `recognized` tags
pub fn split_compartment<'a, S: AsRef<str>>(
    id: &'a str,
    recognized: &[S],
) -> Option<(&'a str, &'a str)> {
    let (base, tag) = id.rsplit_once('_')?;
    if base.is_empty() || !recognized.iter().any(|r| r.as_ref() == tag) {
        return None;
    }
    Some((base, tag))
}

fn is_compartment_tag(tag: &str) -> bool {
    tag.len() == 1 && tag.chars().all(|c| c.is_ascii_lowercase())
}

/// Pick which compartment variant of a reaction keeps the bare base id
///
/// The cytoplasm wins, then the mitochondrion, then whichever remaining tag sorts first.
pub fn preferred_compartment<'a>(compartments: &BTreeSet<&'a str>) -> Option<&'a str> {
    compartments
        .get("c")
        .or_else(|| compartments.get("m"))
        .or_else(|| compartments.first())
        .copied()
}

/// Collapse per-compartment copies of reactions onto a single id, then rename
///
/// Uses the compartment tags from the global configuration, see
/// [`canonicalize_ids_with`] for the details.
pub fn canonicalize_ids<S: AsRef<str>>(
    ids: &[S],
    rename: &HashMap<String, String>,
) -> IndexMap<String, String> {
    let recognized = CONFIGURATION.read().unwrap().recognized_compartments.clone();
    canonicalize_ids_with(ids, rename, &recognized)
}

/// Collapse per-compartment copies of reactions onto a single id, then rename
///
/// Each id ending in one of the `recognized` compartment tags is split into a base and a tag.
/// - A base seen with only one tag maps to the bare base.
/// - A base seen with several tags maps to the bare base only for its preferred variant (see
///   [`preferred_compartment`]), the other variants keep their full id.
/// - Ids without a recognized tag map to themselves.
///
/// Finally, any resulting id found in `rename` is replaced by its entry. The returned map goes
/// from the original id to the new one, in input order.
///
/// # Examples
/// ```rust
/// use std::collections::HashMap;
/// use phycogem_core::identifiers::canonicalize_ids_with;
/// let ids = ["glc_c", "glc_m", "atp_c"];
/// let canonical = canonicalize_ids_with(&ids, &HashMap::new(), &["c", "m"]);
/// assert_eq!(canonical["glc_c"], "glc");
/// assert_eq!(canonical["glc_m"], "glc_m");
/// assert_eq!(canonical["atp_c"], "atp");
/// ```
pub fn canonicalize_ids_with<S: AsRef<str>, T: AsRef<str>>(
    ids: &[S],
    rename: &HashMap<String, String>,
    recognized: &[T],
) -> IndexMap<String, String> {
    let mut variants: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for id in ids {
        if let Some((base, tag)) = split_compartment(id.as_ref(), recognized) {
            variants.entry(base).or_default().insert(tag);
        }
    }
    // Only bases present in more than one compartment need a winner
    let winners: HashMap<&str, &str> = variants
        .iter()
        .filter(|(_, tags)| tags.len() > 1)
        .filter_map(|(base, tags)| preferred_compartment(tags).map(|tag| (*base, tag)))
        .collect();

    let mut canonical: IndexMap<String, String> = IndexMap::new();
    for id in ids {
        let id = id.as_ref();
        if canonical.contains_key(id) {
            continue;
        }
        let collapsed = match split_compartment(id, recognized) {
            Some((base, tag)) => match winners.get(base) {
                Some(winner) if *winner != tag => id,
                _ => base,
            },
            None => id,
        };
        let label = rename
            .get(collapsed)
            .cloned()
            .unwrap_or_else(|| collapsed.to_string());
        debug!("{} -> {}", id, label);
        canonical.insert(id.to_string(), label);
    }
    canonical
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAGS: [&str; 4] = ["c", "h", "m", "x"];

    #[test]
    fn strip_compartment() {
        assert_eq!(remove_compartment("glc__D_e"), "glc__D");
        assert_eq!(remove_compartment("atp_c"), "atp");
        assert_eq!(remove_compartment("atp"), "atp");
        assert_eq!(remove_compartment("h2o_cc"), "h2o_cc");
        assert_eq!(remove_compartment("CO2_C"), "CO2_C");
    }

    #[test]
    fn swap_compartment() {
        assert_eq!(with_compartment("pyr_m", "c"), "pyr_c");
        assert_eq!(with_compartment("glc__D_e", "c"), "glc__D_c");
        assert_eq!(with_compartment("biomass", "c"), "biomass_c");
    }

    #[test]
    fn split_recognized_only() {
        assert_eq!(split_compartment("PFK_c", &TAGS), Some(("PFK", "c")));
        assert_eq!(split_compartment("ATPS4_m_x", &TAGS), Some(("ATPS4_m", "x")));
        assert_eq!(split_compartment("EX_glc__D_e", &TAGS), None);
        assert_eq!(split_compartment("_c", &TAGS), None);
        assert_eq!(split_compartment("PFK", &TAGS), None);
    }

    #[test]
    fn preference_order() {
        let tags: BTreeSet<&str> = ["x", "m", "c"].into_iter().collect();
        assert_eq!(preferred_compartment(&tags), Some("c"));
        let tags: BTreeSet<&str> = ["x", "m", "h"].into_iter().collect();
        assert_eq!(preferred_compartment(&tags), Some("m"));
        let tags: BTreeSet<&str> = ["x", "h"].into_iter().collect();
        assert_eq!(preferred_compartment(&tags), Some("h"));
        assert_eq!(preferred_compartment(&BTreeSet::new()), None);
    }

    #[test]
    fn cytoplasm_wins() {
        let canonical = canonicalize_ids_with(&["glc_c", "glc_m", "atp_c"], &HashMap::new(), &TAGS);
        let expected: IndexMap<String, String> = [
            ("glc_c", "glc"),
            ("glc_m", "glc_m"),
            ("atp_c", "atp"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(canonical, expected);
    }

    #[test]
    fn mitochondrion_beats_others() {
        let canonical =
            canonicalize_ids_with(&["CS_x", "CS_m", "CS_h"], &HashMap::new(), &TAGS);
        assert_eq!(canonical["CS_m"], "CS");
        assert_eq!(canonical["CS_x"], "CS_x");
        assert_eq!(canonical["CS_h"], "CS_h");
    }

    #[test]
    fn other_compartments_resolve_lexically() {
        // Input order does not matter
        let canonical = canonicalize_ids_with(&["ACACT_x", "ACACT_h"], &HashMap::new(), &TAGS);
        assert_eq!(canonical["ACACT_h"], "ACACT");
        assert_eq!(canonical["ACACT_x"], "ACACT_x");
        let canonical = canonicalize_ids_with(&["ACACT_h", "ACACT_x"], &HashMap::new(), &TAGS);
        assert_eq!(canonical["ACACT_h"], "ACACT");
        assert_eq!(canonical["ACACT_x"], "ACACT_x");
    }

    #[test]
    fn unsuffixed_ids_are_unchanged() {
        let canonical =
            canonicalize_ids_with(&["BIOMASS", "EX_co2_e", "PGK_c"], &HashMap::new(), &TAGS);
        assert_eq!(canonical["BIOMASS"], "BIOMASS");
        assert_eq!(canonical["EX_co2_e"], "EX_co2_e");
        assert_eq!(canonical["PGK_c"], "PGK");
    }

    #[test]
    fn rename_applied_last() {
        let mut rename = HashMap::new();
        rename.insert("glc".to_string(), "D-glucose".to_string());
        let canonical = canonicalize_ids_with(&["glc_c"], &rename, &TAGS);
        assert_eq!(canonical["glc_c"], "D-glucose");

        // Renaming uses the canonical id, not the original one
        let mut rename = HashMap::new();
        rename.insert("PGK_c".to_string(), "unused".to_string());
        rename.insert("EX_co2_e".to_string(), "EX_co2".to_string());
        let canonical = canonicalize_ids_with(&["PGK_c", "EX_co2_e"], &rename, &TAGS);
        assert_eq!(canonical["PGK_c"], "PGK");
        assert_eq!(canonical["EX_co2_e"], "EX_co2");
    }

    #[test]
    fn repeated_ids_appear_once() {
        let canonical =
            canonicalize_ids_with(&["PGK_c", "PGK_c", "ENO_c"], &HashMap::new(), &TAGS);
        assert_eq!(canonical.len(), 2);
        assert_eq!(canonical["PGK_c"], "PGK");
        assert_eq!(canonical.get_index(1).unwrap().0, "ENO_c");
    }

    #[test]
    fn global_configuration_tags() {
        let ids = vec!["glc_c".to_string(), "glc_h".to_string()];
        let canonical = canonicalize_ids(&ids, &HashMap::new());
        assert_eq!(canonical["glc_c"], "glc");
        assert_eq!(canonical["glc_h"], "glc_h");
    }
}
