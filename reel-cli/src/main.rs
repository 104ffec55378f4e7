//! Reel CLI - Command-line interface
//!
//! Runs the movie catalog API server and checks seed files.

mod commands;

use clap::Parser;
use reel_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "reel")]
#[command(about = "An in-memory movie catalog API")]
struct Cli {
    /// Console log level; RUST_LOG takes precedence
    #[arg(long, global = true, value_enum, default_value = "info")]
    log_level: CliLogLevel,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_tracing_level())?;

    commands::handle_command(cli.command).await
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::commands::Commands;

    #[test]
    fn test_serve_flags_parse() {
        let cli = Cli::try_parse_from([
            "reel",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "3000",
            "--seed",
            "movies.json",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.log_level, CliLogLevel::Debug);
        match cli.command {
            Commands::Serve { host, port, seed } => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(3000));
                assert_eq!(seed, Some(PathBuf::from("movies.json")));
            }
            Commands::CheckSeed { .. } => panic!("expected serve"),
        }
    }

    #[test]
    fn test_log_level_defaults_to_info() {
        let cli = Cli::try_parse_from(["reel", "serve"]).unwrap();
        assert_eq!(cli.log_level, CliLogLevel::Info);
    }

    #[test]
    fn test_check_seed_requires_path() {
        assert!(Cli::try_parse_from(["reel", "check-seed"]).is_err());
        assert!(Cli::try_parse_from(["reel", "check-seed", "movies.json"]).is_ok());
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        assert!(Cli::try_parse_from(["reel", "--log-level", "loud", "serve"]).is_err());
    }
}
