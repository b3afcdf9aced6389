//! CLI interface and argument parsing

pub mod commands;

use clap::{Parser, Subcommand};

/// pbkit - PocketBase client and collection migration tool
#[derive(Parser, Debug)]
#[command(name = "pbkit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "pbkit.toml", env = "PBKIT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PBKIT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Migrate a collection from the source to the destination instance
    Migrate(commands::migrate::MigrateArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Check that the configured instances are reachable
    Check(commands::check::CheckArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_migrate() {
        let cli = Cli::parse_from(["pbkit", "migrate"]);
        assert_eq!(cli.config, "pbkit.toml");
        assert!(matches!(cli.command, Commands::Migrate(_)));
    }

    #[test]
    fn test_cli_parse_migrate_overrides() {
        let cli = Cli::parse_from([
            "pbkit",
            "migrate",
            "--collection",
            "orders",
            "--skip-existing",
            "--batch-size",
            "20",
            "--yes",
        ]);
        match cli.command {
            Commands::Migrate(args) => {
                assert_eq!(args.collection.as_deref(), Some("orders"));
                assert!(args.skip_existing);
                assert_eq!(args.batch_size, Some(20));
                assert!(args.yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["pbkit", "--config", "custom.toml", "check"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::Check(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["pbkit", "--log-level", "debug", "validate-config"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["pbkit", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init(ref args) if args.force));
    }
}
