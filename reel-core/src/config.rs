//! Centralized configuration for Reel.
//!
//! All tunable parameters are defined here to avoid hard-coded values
//! scattered throughout the codebase.

use std::path::PathBuf;

/// Central configuration for all Reel components.
///
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReelConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub catalog: CatalogConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Interface to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl ServerConfig {
    /// Fallback port when `PORT` is unset or unparsable.
    pub const DEFAULT_PORT: u16 = 8080;

    /// Socket address string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: Self::DEFAULT_PORT,
        }
    }
}

/// Cross-origin request policy.
#[derive(Debug, Clone, PartialEq)]
pub struct CorsConfig {
    /// Port of the browser front end allowed to call the API
    pub frontend_port: u16,
    /// Exact origins allowed to make cross-origin requests
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    /// Default front-end development server port.
    pub const DEFAULT_FRONTEND_PORT: u16 = 53761;

    /// Origin of a front end served from localhost on `port`.
    pub fn localhost_origin(port: u16) -> String {
        format!("http://localhost:{port}")
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            frontend_port: Self::DEFAULT_FRONTEND_PORT,
            allowed_origins: vec![Self::localhost_origin(Self::DEFAULT_FRONTEND_PORT)],
        }
    }
}

/// Catalog seeding configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogConfig {
    /// Seed file to load at startup; `None` uses the embedded seed
    pub seed_path: Option<PathBuf>,
}

impl ReelConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Unparsable values are ignored and the default is kept.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup("PORT").and_then(|value| value.trim().parse::<u16>().ok()) {
            config.server.port = port;
        }

        if let Some(host) = lookup("REEL_HOST").filter(|value| !value.trim().is_empty()) {
            config.server.host = host.trim().to_string();
        }

        if let Some(port) =
            lookup("REEL_FRONTEND_PORT").and_then(|value| value.trim().parse::<u16>().ok())
        {
            config.cors.frontend_port = port;
            config.cors.allowed_origins = vec![CorsConfig::localhost_origin(port)];
        }

        if let Some(origins) = lookup("REEL_ALLOWED_ORIGINS") {
            let origins: Vec<String> = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
            if !origins.is_empty() {
                config.cors.allowed_origins = origins;
            }
        }

        if let Some(path) = lookup("REEL_SEED_PATH").filter(|value| !value.trim().is_empty()) {
            config.catalog.seed_path = Some(PathBuf::from(path));
        }

        config
    }

    /// Creates a configuration for tests: ephemeral port, embedded seed.
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            ..Default::default()
        }
    }
}
