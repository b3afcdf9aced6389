//! Migrate command implementation
//!
//! Copies one collection from `[source]` into `[destination]`.

use super::{EXIT_CONFIG, EXIT_CONNECTION, EXIT_FATAL, EXIT_PARTIAL, EXIT_SUCCESS};
use crate::adapters::pocketbase::PocketBaseClient;
use crate::config::{load_config, PbkitConfig};
use crate::core::migration::{MigrationPipeline, MigrationReport, MigrationTask};
use crate::domain::PbError;
use clap::Args;

/// Failures printed before the list is truncated
const MAX_PRINTED_ERRORS: usize = 10;

/// Arguments for the migrate command
#[derive(Args, Debug, Default)]
pub struct MigrateArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Override the collection to migrate
    #[arg(long)]
    pub collection: Option<String>,

    /// Skip records that already exist in the destination
    #[arg(long)]
    pub skip_existing: bool,

    /// Override the batch size (0 uses the default of 50)
    #[arg(long)]
    pub batch_size: Option<i64>,
}

impl MigrateArgs {
    /// Applies command-line overrides to the loaded configuration
    pub fn apply_overrides(&self, config: &mut PbkitConfig) {
        if let Some(collection) = &self.collection {
            tracing::info!(collection = %collection, "Overriding collection from CLI");
            config.migration.collection = collection.clone();
        }
        if self.skip_existing {
            config.migration.skip_existing = true;
        }
        if let Some(batch_size) = self.batch_size {
            tracing::info!(batch_size = batch_size, "Overriding batch size from CLI");
            config.migration.batch_size = batch_size;
        }
    }

    /// Execute the migrate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting migrate command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG);
            }
        };
        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG);
        }

        let task = match MigrationTask::from_config(&config).and_then(|task| {
            task.validate()?;
            Ok(task)
        }) {
            Ok(task) => task,
            Err(e) => {
                eprintln!("Invalid migration settings: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        if !self.yes {
            println!("Migration Configuration:");
            println!("  Source: {}", config.source.url);
            println!("  Destination: {}", task.destination_url);
            println!("  Collection: {}", task.collection);
            println!("  Skip existing: {}", task.skip_existing);
            println!("  Batch size: {}", task.effective_batch_size());
            println!();
            print!("Proceed with migration? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Migration cancelled.");
                return Ok(EXIT_SUCCESS);
            }
        }

        let clients = PocketBaseClient::from_config(&config.source).and_then(|source| {
            let destination = PocketBaseClient::from_config(&task.destination_config())?;
            Ok((source, destination))
        });
        let (source, destination) = match clients {
            Ok(pair) => pair,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create clients");
                eprintln!("Failed to initialize clients: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        println!("🚀 Starting migration...");
        println!();

        let report = match MigrationPipeline::new(source, destination).run(&task).await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(error = %e, "Migration failed");
                eprintln!("Migration failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        print_report(&report);
        Ok(exit_code_for_report(&report))
    }
}

/// Maps a fatal migration error to an exit code
pub fn exit_code_for(error: &PbError) -> i32 {
    match error {
        PbError::Configuration(_) | PbError::Validation(_) => EXIT_CONFIG,
        PbError::Connection(_) | PbError::Transport(_) => EXIT_CONNECTION,
        _ => EXIT_FATAL,
    }
}

/// Exit code for a finished run
pub fn exit_code_for_report(report: &MigrationReport) -> i32 {
    if report.is_successful() {
        EXIT_SUCCESS
    } else {
        EXIT_PARTIAL
    }
}

fn print_report(report: &MigrationReport) {
    println!("📊 Migration Summary:");
    println!("  Collection: {}", report.source_collection);
    println!("  Total Records: {}", report.total_records);
    println!("  Successful: {}", report.successful_records);
    println!("  Failed: {}", report.failed_records);
    println!("  Skipped: {}", report.skipped_records);
    println!("  Batches: {}", report.batches);
    println!("  Duration: {:.2}s", report.processing_time.as_secs_f64());
    println!("  Success Rate: {:.2}%", report.success_rate());
    println!();

    if !report.errors.is_empty() {
        println!("⚠️  Records not migrated:");
        for error in report.errors.iter().take(MAX_PRINTED_ERRORS) {
            println!(
                "  - #{} {} ({}): {}",
                error.index, error.record_id, error.operation, error.error
            );
        }
        if report.errors.len() > MAX_PRINTED_ERRORS {
            println!("  ... and {} more", report.errors.len() - MAX_PRINTED_ERRORS);
        }
        println!();
    }

    if report.is_successful() {
        println!("✅ {}", report.summary);
    } else {
        println!("⚠️  {}", report.summary);
    }
}
