//! Module for working with the chemical formulas attached to metabolites

pub mod formula;
