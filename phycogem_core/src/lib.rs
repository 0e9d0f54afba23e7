//! Core of phycogem, helpers for curating genome-scale metabolic reconstructions.
//!
//! The [`curation::Gem`] wraps a [`metabolic_model::model::Model`] read with [`io::json`] and
//! provides the curation steps. The leaf utilities, formula classification in [`chemistry`] and
//! compartment handling of ids in [`identifiers`], can be used on their own.

pub mod chemistry;
pub mod configuration;
pub mod curation;
pub mod flux;
pub mod identifiers;
pub mod io;
pub mod metabolic_model;
