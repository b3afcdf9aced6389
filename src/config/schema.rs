//! Configuration schema types
//!
//! This module defines the configuration structure that maps to `pbkit.toml`.

use crate::config::SecretString;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Main pbkit configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PbkitConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Instance records are read from
    pub source: InstanceConfig,

    /// Instance records are migrated into (required by `migrate`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<InstanceConfig>,

    /// Migration settings
    #[serde(default)]
    pub migration: MigrationSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PbkitConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.source.validate("source")?;
        if let Some(ref destination) = self.destination {
            destination.validate("destination")?;
        }
        self.migration.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Connection settings for one backend instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceConfig {
    /// Base URL, e.g. `https://example.pockethost.io`
    pub url: String,

    /// Bearer token sent with each request (admin token for migrations)
    #[serde(default)]
    pub token: Option<SecretString>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Auth collection used by the login helpers
    #[serde(default = "default_auth_collection")]
    pub auth_collection: String,
}

impl InstanceConfig {
    /// Creates an instance config with defaults for everything but the URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
            timeout_seconds: default_timeout_seconds(),
            auth_collection: default_auth_collection(),
        }
    }

    /// Sets the bearer token
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    /// Whether a non-empty token is configured
    pub fn has_token(&self) -> bool {
        self.token
            .as_ref()
            .map(|t| !t.expose_secret().is_empty())
            .unwrap_or(false)
    }

    fn validate(&self, section: &str) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err(format!("{section}.url cannot be empty"));
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(format!(
                "{section}.url must start with http:// or https://, got '{}'",
                self.url
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(format!("{section}.timeout_seconds must be > 0"));
        }
        if self.auth_collection.trim().is_empty() {
            return Err(format!("{section}.auth_collection cannot be empty"));
        }
        Ok(())
    }
}

/// Migration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationSettings {
    /// Collection to migrate (same name on both instances)
    #[serde(default)]
    pub collection: String,

    /// Skip records whose fields already exist in the destination
    #[serde(default)]
    pub skip_existing: bool,

    /// Records per batch; 0 means the default of 50
    #[serde(default = "default_batch_size")]
    pub batch_size: i64,
}

impl MigrationSettings {
    fn validate(&self) -> Result<(), String> {
        if self.batch_size < 0 {
            return Err(format!(
                "migration.batch_size cannot be negative, got {}",
                self.batch_size
            ));
        }
        Ok(())
    }
}

impl Default for MigrationSettings {
    fn default() -> Self {
        Self {
            collection: String::new(),
            skip_existing: false,
            batch_size: default_batch_size(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_auth_collection() -> String {
    "users".to_string()
}

fn default_batch_size() -> i64 {
    50
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
