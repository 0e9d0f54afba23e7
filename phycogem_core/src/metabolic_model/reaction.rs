//! This module provides a struct for representing reactions
use crate::configuration::CONFIGURATION;
use derive_builder::Builder;
use indexmap::IndexMap;

/// Represents a reaction in the metabolic model
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Reaction {
    /// Used to identify the reaction
    pub id: String,
    /// Metabolite stoichiometry of the reaction, keyed by metabolite id
    #[builder(default = "IndexMap::new()")]
    pub metabolites: IndexMap<String, f64>,
    /// Human-readable reaction name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Gene Protein Reaction rule, such as "b0001 and (b0002 or b0003)"
    #[builder(default = "None")]
    pub gene_reaction_rule: Option<String>,
    /// Lower flux bound
    #[builder(default = "CONFIGURATION.read().unwrap().lower_bound")]
    pub lower_bound: f64,
    /// Upper flux bound
    #[builder(default = "CONFIGURATION.read().unwrap().upper_bound")]
    pub upper_bound: f64,
    /// Reaction subsystem
    #[builder(default = "None")]
    pub subsystem: Option<String>,
    /// Notes about the reaction
    #[builder(default = "None")]
    pub notes: Option<String>,
    /// Reaction Annotations
    #[builder(default = "None")]
    pub annotation: Option<String>,
}

impl Reaction {
    /// Set both flux bounds at once
    pub fn set_bounds(&mut self, lower_bound: f64, upper_bound: f64) {
        self.lower_bound = lower_bound;
        self.upper_bound = upper_bound;
    }

    /// A boundary reaction only has a single metabolite, so it creates or consumes mass
    pub fn is_boundary(&self) -> bool {
        self.metabolites.len() == 1
    }

    /// Gene ids referenced by the gene reaction rule, in order of first appearance
    pub fn gene_ids(&self) -> Vec<String> {
        let mut genes: Vec<String> = Vec::new();
        let rule = match self.gene_reaction_rule {
            Some(ref rule) => rule,
            None => return genes,
        };
        for word in rule.split(|c: char| c.is_whitespace() || c == '(' || c == ')') {
            match word {
                "" => {}
                "and" | "And" | "AND" | "or" | "Or" | "OR" | "not" | "Not" | "NOT" => {}
                gene => {
                    if !genes.iter().any(|g| g == gene) {
                        genes.push(gene.to_string());
                    }
                }
            }
        }
        genes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bounds() {
        let rxn = ReactionBuilder::default()
            .id("PFK".to_string())
            .build()
            .unwrap();
        assert_eq!(rxn.lower_bound, -1000.);
        assert_eq!(rxn.upper_bound, 1000.);
        assert!(!rxn.is_boundary());
    }

    #[test]
    fn genes_from_rule() {
        let rxn = ReactionBuilder::default()
            .id("PFK".to_string())
            .gene_reaction_rule(Some("(b3916 and b1723) or not b3916".to_string()))
            .build()
            .unwrap();
        assert_eq!(rxn.gene_ids(), vec!["b3916".to_string(), "b1723".to_string()]);

        let no_rule = ReactionBuilder::default()
            .id("ATPM".to_string())
            .build()
            .unwrap();
        assert!(no_rule.gene_ids().is_empty());
    }
}
