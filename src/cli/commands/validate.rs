//! Validate config command implementation

use super::{EXIT_CONFIG, EXIT_SUCCESS};
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!(
            "  Source: {} (token: {})",
            config.source.url,
            if config.source.has_token() { "set" } else { "none" }
        );
        match &config.destination {
            Some(destination) => println!(
                "  Destination: {} (token: {})",
                destination.url,
                if destination.has_token() { "set" } else { "none" }
            ),
            None => println!("  Destination: not configured"),
        }
        println!(
            "  Collection: {}",
            if config.migration.collection.is_empty() {
                "not set"
            } else {
                config.migration.collection.as_str()
            }
        );
        println!("  Skip Existing: {}", config.migration.skip_existing);
        println!("  Batch Size: {}", config.migration.batch_size);
        println!();
        Ok(EXIT_SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_valid_file_exits_zero() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[source]\nurl = \"https://source.example.com\"").unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, EXIT_SUCCESS);
    }

    #[tokio::test]
    async fn test_invalid_file_exits_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[source]\nurl = \"ftp://source.example.com\"").unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }

    #[tokio::test]
    async fn test_missing_file_exits_config_error() {
        let code = ValidateArgs {}
            .execute("/nonexistent/pbkit.toml")
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }
}
