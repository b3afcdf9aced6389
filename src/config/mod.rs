//! Configuration management for pbkit.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! pbkit uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `PBKIT_*` environment overrides
//! - Default values for optional settings
//! - Validation before any network call
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pbkit::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("pbkit.toml")?;
//!
//! println!("Source: {}", config.source.url);
//! if let Some(destination) = &config.destination {
//!     println!("Destination: {}", destination.url);
//! }
//! println!("Collection: {}", config.migration.collection);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [source]
//! url = "https://source.pockethost.io"
//! token = "${PBKIT_SOURCE_JWT}"
//!
//! [destination]
//! url = "https://destination.pockethost.io"
//! token = "${PBKIT_DESTINATION_JWT}"
//!
//! [migration]
//! collection = "invoices"
//! skip_existing = true
//! batch_size = 50
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_from_str};
pub use schema::{ApplicationConfig, InstanceConfig, LoggingConfig, MigrationSettings, PbkitConfig};
pub use secret::{secret_string, SecretString, SecretValue};
