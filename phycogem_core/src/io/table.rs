//! Tab separated tables used during curation: compound annotations and growth media
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use indexmap::IndexMap;
use thiserror::Error;

use crate::configuration::CONFIGURATION;

/// Formula and charge for a compound, as read from an annotation table
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompoundAnnotation {
    pub formula: Option<String>,
    pub charge: Option<i32>,
}

/// Map of exchange reaction ids to the uptake flux allowed through them
pub type Medium = IndexMap<String, f64>;

/// Read a compound annotation table
///
/// The table needs a header row. The first column holds the compound id (without a compartment
/// suffix), and the columns named `formula` and `charge` hold the annotations. Empty cells leave
/// the corresponding annotation unset.
pub fn read_compound_annotations<P: AsRef<Path>>(
    path: P,
) -> Result<IndexMap<String, CompoundAnnotation>, TableError> {
    let file = File::open(path)?;
    compound_annotations_from_reader(file)
}

pub fn compound_annotations_from_reader<R: Read>(
    reader: R,
) -> Result<IndexMap<String, CompoundAnnotation>, TableError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let formula_col = column_index(&headers, "formula")?;
    let charge_col = column_index(&headers, "charge")?;

    let mut annotations = IndexMap::new();
    for result in reader.records() {
        let record = result?;
        let id = match record.get(0).map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => continue,
        };
        let formula = record
            .get(formula_col)
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string);
        let charge = parse_charge(record.get(charge_col).unwrap_or_default())?;
        annotations.insert(id, CompoundAnnotation { formula, charge });
    }
    Ok(annotations)
}

/// Read a media database, mapping each medium id to its [`Medium`]
///
/// The table needs the columns `medium` and `compound`, each row adding the exchange
/// `EX_{compound}_e` to the medium. An optional `flux` column gives the uptake flux, rows
/// without one use the configured default.
pub fn read_media_database<P: AsRef<Path>>(
    path: P,
) -> Result<IndexMap<String, Medium>, TableError> {
    let file = File::open(path)?;
    media_database_from_reader(file)
}

pub fn media_database_from_reader<R: Read>(
    reader: R,
) -> Result<IndexMap<String, Medium>, TableError> {
    let (prefix, external, default_flux) = {
        let config = CONFIGURATION.read().unwrap();
        (
            config.exchange_prefix.clone(),
            config.external_compartment.clone(),
            config.default_medium_flux,
        )
    };
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let medium_col = column_index(&headers, "medium")?;
    let compound_col = column_index(&headers, "compound")?;
    let flux_col = headers.iter().position(|h| h.trim() == "flux");

    let mut media: IndexMap<String, Medium> = IndexMap::new();
    for result in reader.records() {
        let record = result?;
        let medium_id = record.get(medium_col).unwrap_or_default().trim();
        let compound = record.get(compound_col).unwrap_or_default().trim();
        if medium_id.is_empty() || compound.is_empty() {
            continue;
        }
        let flux = match flux_col.and_then(|i| record.get(i)).map(str::trim) {
            Some(value) if !value.is_empty() => {
                value.parse::<f64>().map_err(|_| TableError::InvalidNumber {
                    column: "flux".to_string(),
                    value: value.to_string(),
                })?
            }
            _ => default_flux,
        };
        media
            .entry(medium_id.to_string())
            .or_default()
            .insert(format!("{}{}_{}", prefix, compound, external), flux);
    }
    Ok(media)
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize, TableError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| TableError::MissingColumn(name.to_string()))
}

/// Charges are sometimes written as floats ("-1.0") by the tools producing these tables
fn parse_charge(value: &str) -> Result<Option<i32>, TableError> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    if let Ok(charge) = value.parse::<i32>() {
        return Ok(Some(charge));
    }
    match value.parse::<f64>() {
        Ok(charge) if charge.is_finite() => Ok(Some(charge.round() as i32)),
        _ => Err(TableError::InvalidNumber {
            column: "charge".to_string(),
            value: value.to_string(),
        }),
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Unable to read table")]
    Io(#[from] std::io::Error),
    #[error("Malformed table: {0}")]
    Csv(#[from] csv::Error),
    #[error("Table has no column named {0}")]
    MissingColumn(String),
    #[error("Invalid number {value} in column {column}")]
    InvalidNumber { column: String, value: String },
}
