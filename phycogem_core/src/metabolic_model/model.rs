//! This module provides the Model struct for representing an entire metabolic model
use indexmap::{IndexMap, IndexSet};
use log::info;
use thiserror::Error;

use crate::configuration::CONFIGURATION;
use crate::metabolic_model::gene::Gene;
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::reaction::Reaction;

/// Represents a Genome Scale Metabolic Model
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    /// Map of reaction ids to Reactions
    pub reactions: IndexMap<String, Reaction>,
    /// Map of gene ids to Genes
    pub genes: IndexMap<String, Gene>,
    /// Map of metabolite ids to Metabolites
    pub metabolites: IndexMap<String, Metabolite>,
    /// Map of reaction ids to objective function coefficients
    pub objective: IndexMap<String, f64>,
    /// Id associated with the Model
    pub id: Option<String>,
    /// Compartments in the model
    ///
    /// An IndexMap<String, String> of {short name: long name}
    pub compartments: Option<IndexMap<String, String>>,
    /// A version identifier for the Model, stored as a string
    pub version: Option<String>,
}

impl Model {
    pub fn new_empty() -> Self {
        Model {
            reactions: IndexMap::new(),
            genes: IndexMap::new(),
            metabolites: IndexMap::new(),
            objective: IndexMap::new(),
            id: None,
            compartments: None,
            version: None,
        }
    }

    /// Add a reaction to the model, replacing any reaction with the same id
    ///
    /// # Parameters
    /// - reaction: Reaction to add
    ///
    /// # Examples
    /// ```rust
    /// use phycogem_core::metabolic_model::model::Model;
    /// use phycogem_core::metabolic_model::reaction::{Reaction, ReactionBuilder};
    /// let mut model = Model::new_empty();
    /// let new_reaction = ReactionBuilder::default().id("new_reaction".to_string()).build().unwrap();
    /// model.add_reaction(new_reaction);
    /// ```
    pub fn add_reaction(&mut self, reaction: Reaction) {
        let id = reaction.id.clone();
        self.reactions.insert(id, reaction);
    }

    /// Add a metabolite to the model
    ///
    /// Returns false, leaving the model untouched, if a metabolite with the same id is already
    /// present.
    pub fn add_metabolite(&mut self, metabolite: Metabolite) -> bool {
        if self.metabolites.contains_key(&metabolite.id) {
            return false;
        }
        self.metabolites.insert(metabolite.id.clone(), metabolite);
        true
    }

    /// Add a gene to the model
    ///
    /// # Examples
    /// ```rust
    /// use phycogem_core::metabolic_model::gene::GeneBuilder;
    /// use phycogem_core::metabolic_model::model::Model;
    /// let mut model=Model::new_empty();
    /// let new_gene = GeneBuilder::default().id("new_gene".to_string()).build().unwrap();
    /// model.add_gene(new_gene);
    /// ```
    pub fn add_gene(&mut self, gene: Gene) {
        let id = gene.id.clone();
        self.genes.insert(id, gene);
    }

    pub fn reaction(&self, id: &str) -> Result<&Reaction, ModelError> {
        self.reactions
            .get(id)
            .ok_or_else(|| ModelError::ReactionNotFound(id.to_string()))
    }

    pub fn reaction_mut(&mut self, id: &str) -> Result<&mut Reaction, ModelError> {
        self.reactions
            .get_mut(id)
            .ok_or_else(|| ModelError::ReactionNotFound(id.to_string()))
    }

    pub fn metabolite(&self, id: &str) -> Result<&Metabolite, ModelError> {
        self.metabolites
            .get(id)
            .ok_or_else(|| ModelError::MetaboliteNotFound(id.to_string()))
    }

    pub fn metabolite_mut(&mut self, id: &str) -> Result<&mut Metabolite, ModelError> {
        self.metabolites
            .get_mut(id)
            .ok_or_else(|| ModelError::MetaboliteNotFound(id.to_string()))
    }

    /// Compartments of all the metabolites taking part in a reaction
    ///
    /// Metabolites which are missing from the model, or have no compartment, are skipped.
    pub fn reaction_compartments(&self, reaction: &Reaction) -> IndexSet<String> {
        reaction
            .metabolites
            .keys()
            .filter_map(|met_id| self.metabolites.get(met_id))
            .filter_map(|met| met.compartment.clone())
            .collect()
    }

    /// Whether a reaction exchanges a single metabolite of the external compartment
    pub fn is_exchange(&self, reaction: &Reaction) -> bool {
        if !reaction.is_boundary() {
            return false;
        }
        let external = CONFIGURATION.read().unwrap().external_compartment.clone();
        reaction
            .metabolites
            .keys()
            .filter_map(|met_id| self.metabolites.get(met_id))
            .all(|met| met.compartment.as_deref() == Some(external.as_str()))
            && self.reaction_compartments(reaction).len() == 1
    }

    /// Ids of all the exchange reactions (see [`Model::is_exchange`])
    pub fn exchanges(&self) -> Vec<String> {
        self.reactions
            .values()
            .filter(|rxn| self.is_exchange(rxn))
            .map(|rxn| rxn.id.clone())
            .collect()
    }

    /// The single metabolite exchanged by a boundary reaction
    pub fn exchanged_metabolite(&self, reaction: &Reaction) -> Option<&Metabolite> {
        if !reaction.is_boundary() {
            return None;
        }
        reaction
            .metabolites
            .keys()
            .next()
            .and_then(|met_id| self.metabolites.get(met_id))
    }

    /// Remove reactions from the model
    ///
    /// Ids not present in the model are ignored. When `remove_orphans` is set, metabolites and
    /// genes which are no longer used by any remaining reaction are removed as well.
    ///
    /// Returns the ids of the reactions actually removed.
    pub fn remove_reactions<S: AsRef<str>>(&mut self, ids: &[S], remove_orphans: bool) -> Vec<String> {
        let mut removed = Vec::new();
        let mut touched_metabolites: IndexSet<String> = IndexSet::new();
        let mut touched_genes: IndexSet<String> = IndexSet::new();
        for id in ids {
            if let Some(rxn) = self.reactions.shift_remove(id.as_ref()) {
                touched_metabolites.extend(rxn.metabolites.keys().cloned());
                touched_genes.extend(rxn.gene_ids());
                self.objective.shift_remove(&rxn.id);
                removed.push(rxn.id);
            }
        }
        if remove_orphans {
            let used_metabolites = self.used_metabolites();
            let used_genes: IndexSet<String> = self
                .reactions
                .values()
                .flat_map(|rxn| rxn.gene_ids())
                .collect();
            self.metabolites
                .retain(|id, _| !touched_metabolites.contains(id) || used_metabolites.contains(id));
            self.genes
                .retain(|id, _| !touched_genes.contains(id) || used_genes.contains(id));
        }
        info!("Removed {} reactions", removed.len());
        removed
    }

    /// Remove every metabolite which no reaction refers to, returning their ids
    pub fn remove_orphan_metabolites(&mut self) -> Vec<String> {
        let used = self.used_metabolites();
        let orphans: Vec<String> = self
            .metabolites
            .keys()
            .filter(|id| !used.contains(*id))
            .cloned()
            .collect();
        for id in &orphans {
            self.metabolites.shift_remove(id);
        }
        orphans
    }

    /// Add an exchange reaction "EX_{met_id}" which consumes the metabolite
    ///
    /// Uses the configured default bounds. Returns the id of the exchange reaction.
    pub fn add_boundary_exchange(&mut self, met_id: &str) -> Result<String, ModelError> {
        self.metabolite(met_id)?;
        let (prefix, lower_bound, upper_bound) = {
            let config = CONFIGURATION.read().unwrap();
            (config.exchange_prefix.clone(), config.lower_bound, config.upper_bound)
        };
        let rxn_id = format!("{}{}", prefix, met_id);
        if self.reactions.contains_key(&rxn_id) {
            return Err(ModelError::DuplicateReaction(rxn_id));
        }
        let mut metabolites = IndexMap::new();
        metabolites.insert(met_id.to_string(), -1.);
        self.add_reaction(Reaction {
            id: rxn_id.clone(),
            metabolites,
            name: Some(format!("{} exchange", met_id)),
            gene_reaction_rule: None,
            lower_bound,
            upper_bound,
            subsystem: None,
            notes: None,
            annotation: None,
        });
        Ok(rxn_id)
    }

    fn used_metabolites(&self) -> IndexSet<String> {
        self.reactions
            .values()
            .flat_map(|rxn| rxn.metabolites.keys().cloned())
            .collect()
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("Reaction {0} is not present in the model")]
    ReactionNotFound(String),
    #[error("Metabolite {0} is not present in the model")]
    MetaboliteNotFound(String),
    #[error("Reaction {0} is already present in the model")]
    DuplicateReaction(String),
}
