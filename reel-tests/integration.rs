//! Integration tests for Reel
//!
//! Each test drives the full router in-process, CORS gate and tracing
//! layers included, against a catalog built from the embedded seed.

#[path = "integration/support.rs"]
mod support;

#[path = "integration/movie_routes.rs"]
mod movie_routes;

#[path = "integration/cors_policy.rs"]
mod cors_policy;
