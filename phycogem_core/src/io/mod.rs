//! Module for reading and writing Models, and the tab separated tables used to curate them
pub mod json;
pub mod table;
