//! Reel Core - Movie catalog domain and storage
//!
//! This crate provides the building blocks of the Reel movie catalog:
//! the movie record model, the declarative payload validator, the in-memory
//! catalog store, seed loading, and configuration management.

pub mod catalog;
pub mod config;
pub mod movie;
pub mod seed;
pub mod tracing_setup;
pub mod validation;

// Re-export main types for convenient access
pub use catalog::{CatalogError, MovieCatalog, SharedCatalog};
pub use config::ReelConfig;
pub use movie::{Genre, MovieDraft, MovieId, MoviePatch, MovieRecord};
pub use validation::{Issue, IssueCode, PathSegment, ValidationReport};

/// Core errors that can bubble up from any Reel subsystem.
#[derive(Debug, thiserror::Error)]
pub enum ReelError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Seed record {index} is invalid: {report}")]
    InvalidSeedRecord {
        index: usize,
        report: ValidationReport,
    },

    #[error("Seed record {index} has no usable id: {reason}")]
    SeedIdentifier { index: usize, reason: String },

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging setup failed: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

pub type Result<T> = std::result::Result<T, ReelError>;
