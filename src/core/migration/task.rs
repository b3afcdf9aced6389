//! Migration task definition

use crate::config::{secret_string, InstanceConfig, PbkitConfig, SecretString};
use crate::domain::{PbError, Result};
use secrecy::ExposeSecret;

/// Batch size used when the task asks for 0
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Where and how to migrate one collection
///
/// The source is the client the task is run against; the collection has the
/// same name on both instances.
#[derive(Debug, Clone)]
pub struct MigrationTask {
    /// Base URL of the destination instance
    pub destination_url: String,

    /// Admin token for the destination instance
    pub destination_token: SecretString,

    /// Collection to copy
    pub collection: String,

    /// Skip records whose fields already exist in the destination
    pub skip_existing: bool,

    /// Records per batch; 0 means [`DEFAULT_BATCH_SIZE`], negative is invalid
    pub batch_size: i64,
}

impl MigrationTask {
    pub fn new(
        destination_url: impl Into<String>,
        destination_token: SecretString,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            destination_url: destination_url.into(),
            destination_token,
            collection: collection.into(),
            skip_existing: false,
            batch_size: 0,
        }
    }

    pub fn with_skip_existing(mut self, skip_existing: bool) -> Self {
        self.skip_existing = skip_existing;
        self
    }

    pub fn with_batch_size(mut self, batch_size: i64) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Builds a task from the `[destination]` and `[migration]` sections
    ///
    /// # Errors
    ///
    /// Returns [`PbError::Configuration`] when there is no destination section.
    pub fn from_config(config: &PbkitConfig) -> Result<Self> {
        let destination = config.destination.as_ref().ok_or_else(|| {
            PbError::Configuration("a [destination] section is required for migration".to_string())
        })?;

        let token = destination
            .token
            .clone()
            .unwrap_or_else(|| secret_string(String::new()));

        Ok(Self::new(destination.url.clone(), token, config.migration.collection.clone())
            .with_skip_existing(config.migration.skip_existing)
            .with_batch_size(config.migration.batch_size))
    }

    /// Checks required fields; runs before any network call
    pub fn validate(&self) -> Result<()> {
        if self.destination_url.trim().is_empty() {
            return Err(PbError::Configuration("destination URL is required".to_string()));
        }
        if self.destination_token.expose_secret().is_empty() {
            return Err(PbError::Configuration("destination token is required".to_string()));
        }
        if self.collection.trim().is_empty() {
            return Err(PbError::Configuration("collection name is required".to_string()));
        }
        if self.batch_size < 0 {
            return Err(PbError::Configuration(format!(
                "batch size cannot be negative, got {}",
                self.batch_size
            )));
        }
        Ok(())
    }

    /// Batch size with the default applied
    pub fn effective_batch_size(&self) -> usize {
        usize::try_from(self.batch_size)
            .ok()
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_BATCH_SIZE)
    }

    /// Connection settings for the destination client
    pub fn destination_config(&self) -> InstanceConfig {
        InstanceConfig::new(self.destination_url.clone()).with_token(self.destination_token.clone())
    }
}
