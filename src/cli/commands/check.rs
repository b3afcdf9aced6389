//! Check command implementation
//!
//! Lists the migration collection on each configured instance to confirm it
//! is reachable and the token is accepted.

use super::{EXIT_CONFIG, EXIT_CONNECTION, EXIT_SUCCESS};
use crate::adapters::pocketbase::PocketBaseClient;
use crate::config::{load_config, InstanceConfig};
use clap::Args;

/// Arguments for the check command
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Collection to list (defaults to `migration.collection`)
    #[arg(long)]
    pub collection: Option<String>,
}

/// Result of probing one instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Reachable { records: usize },
    Unreachable { error: String },
}

/// Lists `collection` on one instance
pub async fn probe(instance: &InstanceConfig, collection: &str) -> Probe {
    let client = match PocketBaseClient::from_config(instance) {
        Ok(client) => client,
        Err(e) => {
            return Probe::Unreachable {
                error: e.to_string(),
            }
        }
    };

    match client.all(collection).await {
        Ok(page) => Probe::Reachable {
            records: page.len(),
        },
        Err(e) => Probe::Unreachable {
            error: e.to_string(),
        },
    }
}

impl CheckArgs {
    /// Execute the check command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking instance connectivity");

        println!("🔌 Connectivity Check");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {}", e);
                return Ok(EXIT_CONFIG);
            }
        };

        let collection = self
            .collection
            .clone()
            .unwrap_or_else(|| config.migration.collection.clone());
        if collection.is_empty() {
            println!("❌ No collection to check");
            println!("   Set migration.collection or pass --collection");
            return Ok(EXIT_CONFIG);
        }

        let mut instances = vec![("source", &config.source)];
        if let Some(ref destination) = config.destination {
            instances.push(("destination", destination));
        }

        let mut all_reachable = true;
        for (label, instance) in instances {
            match probe(instance, &collection).await {
                Probe::Reachable { records } => {
                    tracing::info!(instance = label, url = %instance.url, records = records, "Instance reachable");
                    println!("✅ {label}: {} ({records} records in '{collection}')", instance.url);
                }
                Probe::Unreachable { error } => {
                    tracing::warn!(instance = label, url = %instance.url, error = %error, "Instance unreachable");
                    println!("❌ {label}: {}", instance.url);
                    println!("   Error: {error}");
                    all_reachable = false;
                }
            }
        }
        println!();

        Ok(if all_reachable {
            EXIT_SUCCESS
        } else {
            EXIT_CONNECTION
        })
    }
}
