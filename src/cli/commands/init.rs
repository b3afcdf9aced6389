//! Init command implementation
//!
//! Writes a starter `pbkit.toml`.

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_SUCCESS};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "pbkit.toml")]
    pub output: String,

    /// Include comments explaining each option
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing pbkit configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your instance URLs", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - PBKIT_SOURCE_TOKEN");
                println!("     - PBKIT_DESTINATION_TOKEN");
                println!("  3. Validate configuration: pbkit validate-config");
                println!("  4. Check connectivity: pbkit check");
                println!("  5. Run migration: pbkit migrate");
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# pbkit configuration file

[application]
log_level = "info"

[source]
url = "https://source.pockethost.io"
token = "${PBKIT_SOURCE_TOKEN}"
timeout_seconds = 10

[destination]
url = "https://destination.pockethost.io"
token = "${PBKIT_DESTINATION_TOKEN}"
timeout_seconds = 10

[migration]
collection = "invoices"
skip_existing = true
batch_size = 50

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# pbkit configuration file
#
# Values of the form ${NAME} are read from the environment (or .env).
# PBKIT_SOURCE_URL, PBKIT_MIGRATION_BATCH_SIZE and similar variables
# override the matching keys below.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Source Instance
# ============================================================================
[source]
# Base URL of the instance records are read from
url = "https://source.pockethost.io"

# Admin token (use environment variable)
token = "${PBKIT_SOURCE_TOKEN}"

# Per-request timeout in seconds
timeout_seconds = 10

# Auth collection used by login helpers
auth_collection = "users"

# ============================================================================
# Destination Instance (required by `pbkit migrate`)
# ============================================================================
[destination]
url = "https://destination.pockethost.io"
token = "${PBKIT_DESTINATION_TOKEN}"
timeout_seconds = 10

# ============================================================================
# Migration Settings
# ============================================================================
[migration]
# Collection to copy; must exist on both instances under the same name
collection = "invoices"

# Skip source records whose fields already exist in the destination.
# Each batch lists the whole destination collection once.
skip_existing = true

# Records per batch (0 = default of 50)
batch_size = 50

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = false

# Local log directory
local_path = "./logs"

# Log rotation (daily, hourly or never)
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PbkitConfig;
    use tempfile::TempDir;

    #[test]
    fn test_generate_minimal_config_parses() {
        let config = InitArgs::generate_minimal_config();
        assert!(config.contains("[source]"));
        assert!(config.contains("[destination]"));

        // Substitution is skipped here, so the placeholders stay literal
        let parsed: PbkitConfig = toml::from_str(&config).unwrap();
        assert_eq!(parsed.migration.collection, "invoices");
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_generate_config_with_examples_parses() {
        let config = InitArgs::generate_config_with_examples();
        assert!(config.contains("batch_size"));
        let parsed: PbkitConfig = toml::from_str(&config).unwrap();
        assert_eq!(parsed.migration.batch_size, 50);
    }

    #[tokio::test]
    async fn test_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("pbkit.toml");
        fs::write(&output, "existing").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), EXIT_CONFIG);
        assert_eq!(fs::read_to_string(&output).unwrap(), "existing");

        let args = InitArgs { force: true, ..args };
        assert_eq!(args.execute().await.unwrap(), EXIT_SUCCESS);
        assert!(fs::read_to_string(&output).unwrap().contains("[migration]"));
    }
}
