//! Startup seed data for the catalog.
//!
//! A seed is a JSON array of complete movie records, ids included. Every
//! record is run through the full-schema validator before the catalog is
//! built, so a bad seed fails startup instead of loading partially.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::catalog::MovieCatalog;
use crate::movie::{MovieId, MovieRecord};
use crate::validation::validate_movie;
use crate::{ReelError, Result};

/// Seed compiled into the binary, used when no seed path is configured.
pub const EMBEDDED_SEED: &str = include_str!("../data/movies.json");

/// Parses and validates seed records from JSON text.
///
/// # Errors
///
/// - `ReelError::Json` - If the text is not a JSON array
/// - `ReelError::InvalidSeedRecord` - If a record fails schema validation
/// - `ReelError::SeedIdentifier` - If a record has a missing or malformed id
pub fn parse_seed(json: &str) -> Result<Vec<MovieRecord>> {
    let entries: Vec<Value> = serde_json::from_str(json)?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let draft = validate_movie(entry)
                .map_err(|report| ReelError::InvalidSeedRecord { index, report })?;
            let id = seed_id(index, entry)?;
            Ok(draft.into_record(id))
        })
        .collect()
}

/// Builds a catalog from the seed at `path`, or from the embedded seed.
///
/// # Errors
///
/// - `ReelError::Io` - If the seed file cannot be read
/// - `ReelError::Catalog` - If two seed records share an id
/// - Any error from [`parse_seed`]
pub fn load_catalog(path: Option<&Path>) -> Result<MovieCatalog> {
    let records = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            let records = parse_seed(&json)?;
            info!(path = %path.display(), count = records.len(), "Loaded seed file");
            records
        }
        None => {
            let records = parse_seed(EMBEDDED_SEED)?;
            info!(count = records.len(), "Loaded embedded seed");
            records
        }
    };

    Ok(MovieCatalog::from_records(records)?)
}

fn seed_id(index: usize, entry: &Value) -> Result<MovieId> {
    let text = entry
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| ReelError::SeedIdentifier {
            index,
            reason: "missing string id".to_string(),
        })?;

    MovieId::parse(text).ok_or_else(|| ReelError::SeedIdentifier {
        index,
        reason: format!("'{text}' is not a lowercase hyphenated UUID"),
    })
}
