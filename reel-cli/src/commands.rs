//! CLI command implementations

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use reel_core::ReelConfig;
use reel_core::seed::load_catalog;
use tracing::info;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to [env: REEL_HOST]
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to [env: PORT]
        #[arg(short, long)]
        port: Option<u16>,
        /// Seed file to load instead of the embedded catalog [env: REEL_SEED_PATH]
        #[arg(long)]
        seed: Option<PathBuf>,
    },
    /// Validate a seed file without starting the server
    CheckSeed {
        /// Path to a JSON array of movie records
        path: PathBuf,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Serve { host, port, seed } => {
            let config = apply_overrides(ReelConfig::from_env(), host, port, seed);
            start_server(config).await
        }
        Commands::CheckSeed { path } => {
            let count = check_seed(&path)?;
            println!("{}: {count} valid movie records", path.display());
            Ok(())
        }
    }
}

/// Layers command-line flags over environment-derived configuration.
fn apply_overrides(
    mut config: ReelConfig,
    host: Option<String>,
    port: Option<u16>,
    seed: Option<PathBuf>,
) -> ReelConfig {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if seed.is_some() {
        config.catalog.seed_path = seed;
    }
    config
}

async fn start_server(config: ReelConfig) -> anyhow::Result<()> {
    let catalog = load_catalog(config.catalog.seed_path.as_deref())
        .context("failed to load the movie catalog")?;

    info!(
        host = %config.server.host,
        port = config.server.port,
        "Starting Reel API server"
    );

    reel_web::run_server(config, catalog)
        .await
        .context("server exited with an error")
}

/// Loads `path` as a seed and returns how many records it holds.
fn check_seed(path: &Path) -> anyhow::Result<usize> {
    let catalog =
        load_catalog(Some(path)).with_context(|| format!("invalid seed {}", path.display()))?;
    Ok(catalog.len())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use reel_core::seed::EMBEDDED_SEED;

    use super::*;

    #[test]
    fn test_flags_override_environment() {
        let mut env = ReelConfig::default();
        env.server.host = "0.0.0.0".to_string();
        env.server.port = 9000;

        let config = apply_overrides(
            env,
            Some("127.0.0.1".to_string()),
            Some(3000),
            Some(PathBuf::from("movies.json")),
        );

        assert_eq!(config.server.bind_address(), "127.0.0.1:3000");
        assert_eq!(
            config.catalog.seed_path,
            Some(PathBuf::from("movies.json"))
        );
    }

    #[test]
    fn test_absent_flags_keep_environment() {
        let mut env = ReelConfig::default();
        env.server.port = 9000;
        env.catalog.seed_path = Some(PathBuf::from("/srv/reel/movies.json"));

        let config = apply_overrides(env.clone(), None, None, None);
        assert_eq!(config, env);
    }

    #[test]
    fn test_check_seed_counts_records() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EMBEDDED_SEED.as_bytes()).unwrap();

        assert_eq!(check_seed(file.path()).unwrap(), 10);
    }

    #[test]
    fn test_check_seed_reports_bad_record() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[{"title": "Untitled"}]"#).unwrap();

        let error = check_seed(file.path()).unwrap_err();
        assert!(error.to_string().starts_with("invalid seed"));
    }
}
