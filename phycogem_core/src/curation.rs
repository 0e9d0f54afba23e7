//! Curation of a genome-scale reconstruction: removing shuttles and duplicates, relocating
//! reactions to the cytoplasm, annotating compounds, and setting up exchanges and media.
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use log::{debug, info, warn};
use thiserror::Error;

use crate::chemistry::formula::ExchangeClass;
use crate::configuration::CONFIGURATION;
use crate::identifiers::{remove_compartment, with_compartment};
use crate::io::table::{
    read_compound_annotations, read_media_database, CompoundAnnotation, Medium, TableError,
};
use crate::metabolic_model::model::{Model, ModelError};
use crate::metabolic_model::reaction::Reaction;

/// A genome-scale metabolic model being curated
///
/// Keeps the model as it was handed over, so that all curation steps can be undone with
/// [`Gem::reset`].
#[derive(Clone, Debug)]
pub struct Gem {
    model: Model,
    original: Model,
}

impl Gem {
    pub fn new(model: Model) -> Self {
        Gem {
            original: model.clone(),
            model,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    pub fn into_model(self) -> Model {
        self.model
    }

    /// Discard every change made since the Gem was created
    pub fn reset(&mut self) {
        self.model = self.original.clone();
    }

    /// Remove reactions spanning several compartments, unless every compartment is allowed
    ///
    /// Metabolites and genes left unused are removed too. Returns the removed reaction ids.
    pub fn remove_shuttle_reactions<S: AsRef<str>>(&mut self, allowed: &[S]) -> Vec<String> {
        let shuttles: Vec<String> = self
            .model
            .reactions
            .values()
            .filter(|rxn| {
                let compartments = self.model.reaction_compartments(rxn);
                compartments.len() > 1 && !is_subset(&compartments, allowed)
            })
            .map(|rxn| rxn.id.clone())
            .collect();
        debug!("Shuttle reactions: {:?}", shuttles);
        self.model.remove_reactions(&shuttles, true)
    }

    /// Move every reaction with a compartment outside `allowed` into the cytoplasm
    ///
    /// Each metabolite of such a reaction is swapped for its cytoplasmic twin, which is created
    /// as a copy when the model lacks it. Coefficients of metabolites landing on the same twin are
    /// summed, and dropped if they cancel out. Metabolites left unused by the move are removed.
    ///
    /// Returns the ids of the relocated reactions.
    pub fn move_reactions_to_cytoplasm<S: AsRef<str>>(&mut self, allowed: &[S]) -> Vec<String> {
        let cytoplasm = CONFIGURATION.read().unwrap().cytoplasm.clone();
        let to_move: Vec<String> = self
            .model
            .reactions
            .values()
            .filter(|rxn| !is_subset(&self.model.reaction_compartments(rxn), allowed))
            .map(|rxn| rxn.id.clone())
            .collect();

        let mut replaced: IndexSet<String> = IndexSet::new();
        for rxn_id in &to_move {
            let old_metabolites = match self.model.reactions.get(rxn_id) {
                Some(rxn) => rxn.metabolites.clone(),
                None => continue,
            };
            let mut new_metabolites: IndexMap<String, f64> = IndexMap::new();
            for (met_id, coefficient) in old_metabolites {
                let new_id = with_compartment(&met_id, &cytoplasm);
                if !self.model.metabolites.contains_key(&new_id) {
                    if let Some(met) = self.model.metabolites.get(&met_id) {
                        let mut twin = met.clone();
                        twin.id = new_id.clone();
                        twin.compartment = Some(cytoplasm.clone());
                        self.model.add_metabolite(twin);
                    }
                }
                if new_id != met_id {
                    replaced.insert(met_id);
                }
                *new_metabolites.entry(new_id).or_insert(0.) += coefficient;
            }
            new_metabolites.retain(|_, coefficient| *coefficient != 0.);
            if let Some(rxn) = self.model.reactions.get_mut(rxn_id) {
                rxn.metabolites = new_metabolites;
            }
        }

        let used: IndexSet<String> = self
            .model
            .reactions
            .values()
            .flat_map(|rxn| rxn.metabolites.keys().cloned())
            .collect();
        self.model
            .metabolites
            .retain(|id, _| !replaced.contains(id) || used.contains(id));
        info!("Moved {} reactions to the cytoplasm", to_move.len());
        to_move
    }

    /// Annotate formula and charge of the metabolites from a compound table
    ///
    /// See [`read_compound_annotations`] for the table format. Returns the number of metabolites
    /// annotated.
    pub fn annotate_compounds<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, CurationError> {
        let annotations = read_compound_annotations(path)?;
        Ok(self.annotate_compounds_with(&annotations))
    }

    /// Annotate formula and charge of the metabolites, matching on their compartment-free id
    ///
    /// An empty cell in the table leaves the corresponding metabolite field untouched.
    pub fn annotate_compounds_with(
        &mut self,
        annotations: &IndexMap<String, CompoundAnnotation>,
    ) -> usize {
        let mut annotated = 0;
        for met in self.model.metabolites.values_mut() {
            if let Some(annotation) = annotations.get(remove_compartment(&met.id)) {
                if let Some(ref formula) = annotation.formula {
                    met.formula = Some(formula.clone());
                }
                if let Some(charge) = annotation.charge {
                    met.charge = charge;
                }
                annotated += 1;
            }
        }
        info!("Annotated {} metabolites", annotated);
        annotated
    }

    /// Allow uptake through every exchange reaction
    pub fn open_exchanges(&mut self) {
        let lower_bound = CONFIGURATION.read().unwrap().lower_bound;
        for rxn_id in self.model.exchanges() {
            if let Some(rxn) = self.model.reactions.get_mut(&rxn_id) {
                rxn.lower_bound = lower_bound;
            }
        }
    }

    /// Block uptake through every reaction with the exchange prefix
    pub fn close_exchanges(&mut self) {
        let prefix = CONFIGURATION.read().unwrap().exchange_prefix.clone();
        self.model
            .reactions
            .values_mut()
            .filter(|rxn| rxn.id.starts_with(&prefix))
            .for_each(|rxn| rxn.lower_bound = 0.);
    }

    /// Remove the first reaction of each pair of duplicated reactions
    ///
    /// Returns the removed reaction ids, ids not present in the model are skipped.
    pub fn remove_duplicated_reactions<S: AsRef<str>>(&mut self, pairs: &[(S, S)]) -> Vec<String> {
        let first: Vec<&str> = pairs.iter().map(|(first, _)| first.as_ref()).collect();
        self.model.remove_reactions(&first, true)
    }

    /// Ids of exchanges whose metabolite is organic
    pub fn organic_exchanges(&self) -> Vec<String> {
        self.exchanges_of_class(ExchangeClass::Organic)
    }

    /// Ids of exchanges whose metabolite is inorganic (including CO2 and bicarbonate)
    pub fn inorganic_exchanges(&self) -> Vec<String> {
        self.exchanges_of_class(ExchangeClass::Inorganic)
    }

    fn exchanges_of_class(&self, class: ExchangeClass) -> Vec<String> {
        self.model
            .exchanges()
            .into_iter()
            .filter(|rxn_id| self.exchange_class(rxn_id) == class)
            .collect()
    }

    fn exchange_class(&self, rxn_id: &str) -> ExchangeClass {
        self.model
            .reactions
            .get(rxn_id)
            .and_then(|rxn| self.model.exchanged_metabolite(rxn))
            .map(|met| met.exchange_class())
            .unwrap_or(ExchangeClass::Unknown)
    }

    /// Open inorganic exchanges and close organic ones
    ///
    /// Exchanges listed in `include` are opened whatever their metabolite. Exchanges whose
    /// metabolite has no formula are left alone.
    pub fn open_inorganic_exchanges<S: AsRef<str>>(
        &mut self,
        lower_bound: f64,
        upper_bound: f64,
        include: &[S],
    ) {
        for rxn_id in self.model.exchanges() {
            let included = include.iter().any(|i| i.as_ref() == rxn_id);
            let class = self.exchange_class(&rxn_id);
            let rxn = match self.model.reactions.get_mut(&rxn_id) {
                Some(rxn) => rxn,
                None => continue,
            };
            match class {
                _ if included => rxn.set_bounds(lower_bound, upper_bound),
                ExchangeClass::Inorganic => rxn.set_bounds(lower_bound, upper_bound),
                ExchangeClass::Organic => rxn.lower_bound = 0.,
                ExchangeClass::Unknown => {}
            }
        }
    }

    /// Copy a metabolite into the external compartment
    ///
    /// Returns the id of the external copy. If the model already has it, it is reused as is.
    pub fn add_external_metabolite(&mut self, met_id: &str) -> Result<String, CurationError> {
        let external = CONFIGURATION.read().unwrap().external_compartment.clone();
        let met = self.model.metabolite(met_id)?;
        let mut copy = met.clone();
        copy.id = with_compartment(met_id, &external);
        copy.compartment = Some(external);
        let new_id = copy.id.clone();
        if !self.model.add_metabolite(copy) {
            warn!("Metabolite {} is already in the model", new_id);
        }
        Ok(new_id)
    }

    /// Add a spontaneous transport reaction "TR_{from}_to_{to}" between two metabolites
    ///
    /// Returns the id of the new reaction.
    pub fn add_transport_reaction(
        &mut self,
        from: &str,
        to: &str,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<String, CurationError> {
        self.model.metabolite(from)?;
        self.model.metabolite(to)?;
        let rxn_id = format!("TR_{}_to_{}", from, to);
        let mut metabolites = IndexMap::new();
        metabolites.insert(from.to_string(), -1.);
        metabolites.insert(to.to_string(), 1.);
        self.model.add_reaction(Reaction {
            id: rxn_id.clone(),
            metabolites,
            name: Some(format!("Transport of {} to {}", from, to)),
            gene_reaction_rule: Some("Spontaneous".to_string()),
            lower_bound,
            upper_bound,
            subsystem: Some("Transport".to_string()),
            notes: None,
            annotation: None,
        });
        Ok(rxn_id)
    }

    /// Add exchange reactions for a list of metabolites
    ///
    /// Metabolites outside the external compartment first get an external copy and a transport
    /// reaction to it. Metabolites missing from the model are skipped with a warning.
    ///
    /// Returns the ids of the exchange reactions added.
    pub fn add_exchanges_for_metabolites<S: AsRef<str>>(
        &mut self,
        met_ids: &[S],
    ) -> Result<Vec<String>, CurationError> {
        let (external, lower_bound, upper_bound) = {
            let config = CONFIGURATION.read().unwrap();
            (
                config.external_compartment.clone(),
                config.lower_bound,
                config.upper_bound,
            )
        };
        let mut added = Vec::new();
        for met_id in met_ids {
            let met_id = met_id.as_ref();
            let compartment = match self.model.metabolites.get(met_id) {
                Some(met) => met.compartment.clone(),
                None => {
                    warn!("Metabolite {} not found in the model", met_id);
                    continue;
                }
            };
            let exchanged = if compartment.as_deref() == Some(external.as_str()) {
                met_id.to_string()
            } else {
                let external_id = self.add_external_metabolite(met_id)?;
                self.add_transport_reaction(met_id, &external_id, lower_bound, upper_bound)?;
                external_id
            };
            match self.model.add_boundary_exchange(&exchanged) {
                Ok(rxn_id) => added.push(rxn_id),
                Err(ModelError::DuplicateReaction(rxn_id)) => {
                    warn!("Exchange {} is already in the model", rxn_id)
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(added)
    }

    /// Set the growth medium from a media database table
    ///
    /// See [`read_media_database`] for the table format, and [`Gem::set_medium_with`] for how
    /// the medium is applied.
    pub fn set_medium<P: AsRef<Path>>(
        &mut self,
        medium_id: &str,
        media_db: P,
        carbon_source: Option<(&str, f64)>,
    ) -> Result<(), CurationError> {
        let media = read_media_database(media_db)?;
        let medium = media
            .get(medium_id)
            .ok_or_else(|| CurationError::MediumNotFound(medium_id.to_string()))?;
        self.set_medium_with(medium, carbon_source);
        Ok(())
    }

    /// Close all exchanges, then allow uptake of the medium components
    ///
    /// The carbon source, given as (exchange id, uptake flux), is added to the medium or
    /// overrides its entry. Medium components without an exchange in the model are ignored.
    pub fn set_medium_with(&mut self, medium: &Medium, carbon_source: Option<(&str, f64)>) {
        self.close_exchanges();
        let mut medium = medium.clone();
        if let Some((rxn_id, flux)) = carbon_source {
            medium.insert(rxn_id.to_string(), flux);
        }
        for (rxn_id, flux) in &medium {
            match self.model.reactions.get_mut(rxn_id) {
                Some(rxn) => rxn.lower_bound = -flux,
                None => debug!("Medium component {} has no exchange in the model", rxn_id),
            }
        }
    }
}

fn is_subset<S: AsRef<str>>(compartments: &IndexSet<String>, allowed: &[S]) -> bool {
    compartments
        .iter()
        .all(|c| allowed.iter().any(|a| a.as_ref() == c))
}

#[derive(Debug, Error)]
pub enum CurationError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("Unable to read curation table")]
    Table(#[from] TableError),
    #[error("Medium {0} is not in the media database")]
    MediumNotFound(String),
}
