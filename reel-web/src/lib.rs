//! Reel Web - JSON API Server

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! REST endpoints over the in-memory movie catalog, with schema validation
//! on write paths and origin gating on cross-origin requests.

pub mod cors;
pub mod error;
pub mod handlers;
pub mod server;

// Re-export main types
pub use cors::CorsPolicy;
pub use error::ApiError;
pub use server::{AppState, build_router, run_server};
