//! Collection migration pipeline
//!
//! validate -> connect-check -> extract -> batch loop -> report. Stages run
//! in order with no retries. Only the first three can fail the whole run;
//! per-record failures land in the [`MigrationReport`].

use super::report::{MigrationReport, RecordError, OP_CREATE, OP_EXISTENCE_CHECK};
use super::sanitize::{sanitize_record, MigrationRecord};
use super::task::MigrationTask;
use crate::adapters::pocketbase::PocketBaseClient;
use crate::core::bulk::BulkEngine;
use crate::domain::{PbError, Result};
use serde_json::{Map, Value};
use std::time::Instant;

/// Copies one collection from a source instance into a destination
pub struct MigrationPipeline {
    source: PocketBaseClient,
    destination: PocketBaseClient,
    engine: BulkEngine,
}

impl MigrationPipeline {
    pub fn new(source: PocketBaseClient, destination: PocketBaseClient) -> Self {
        let engine = BulkEngine::new(destination.clone());
        Self {
            source,
            destination,
            engine,
        }
    }

    /// Runs the migration described by `task`
    ///
    /// # Errors
    ///
    /// - [`PbError::Configuration`] if the task is invalid
    /// - [`PbError::Connection`] if the destination collection cannot be listed
    /// - the transport error if the source collection cannot be fetched
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pbkit::adapters::pocketbase::PocketBaseClient;
    /// use pbkit::config::secret_string;
    /// use pbkit::core::migration::{MigrationPipeline, MigrationTask};
    ///
    /// # async fn example() -> pbkit::domain::Result<()> {
    /// let source = PocketBaseClient::new("https://source.pockethost.io", "source-admin")?;
    /// let destination = PocketBaseClient::new("https://dest.pockethost.io", "dest-admin")?;
    ///
    /// let task = MigrationTask::new(
    ///     "https://dest.pockethost.io",
    ///     secret_string("dest-admin".to_string()),
    ///     "invoices",
    /// )
    /// .with_skip_existing(true);
    ///
    /// let report = MigrationPipeline::new(source, destination).run(&task).await?;
    /// println!("{}", report.summary);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run(&self, task: &MigrationTask) -> Result<MigrationReport> {
        task.validate()?;

        let started = Instant::now();
        let collection = task.collection.as_str();
        let batch_size = task.effective_batch_size();

        tracing::info!(
            collection = collection,
            destination = %task.destination_url,
            skip_existing = task.skip_existing,
            batch_size = batch_size,
            "Starting migration"
        );

        self.destination.all(collection).await.map_err(|e| {
            PbError::Connection(format!(
                "destination collection '{collection}' is not reachable: {e}"
            ))
        })?;

        let page = self.source.all(collection).await?;
        let records: Vec<MigrationRecord> = page.items.into_iter().map(sanitize_record).collect();

        if records.is_empty() {
            tracing::info!(collection = collection, "Source collection is empty");
            return Ok(MigrationReport::empty(collection, started.elapsed()));
        }

        let total_batches = records.len().div_ceil(batch_size);
        tracing::info!(
            collection = collection,
            records = records.len(),
            batches = total_batches,
            "Extracted source records"
        );

        let mut report = MigrationReport::new(collection);
        report.total_records = records.len();

        for (batch_number, batch) in records.chunks(batch_size).enumerate() {
            let offset = batch_number * batch_size;
            crate::log_batch_processing!(batch_number + 1, total_batches);
            self.migrate_batch(task, offset, batch, &mut report).await;
            report.batches += 1;

            tracing::debug!(
                batch = batch_number + 1,
                size = batch.len(),
                successful = report.successful_records,
                failed = report.failed_records,
                skipped = report.skipped_records,
                "Batch complete"
            );
        }

        report.finalize(started.elapsed());
        report.log_summary();
        Ok(report)
    }

    /// Migrates one contiguous chunk starting at `offset` in the source list
    async fn migrate_batch(
        &self,
        task: &MigrationTask,
        offset: usize,
        batch: &[MigrationRecord],
        report: &mut MigrationReport,
    ) {
        let pending: Vec<(usize, &MigrationRecord)> = if task.skip_existing {
            match self.destination_snapshot(&task.collection).await {
                Ok(existing) => {
                    let mut pending: Vec<(usize, &MigrationRecord)> = Vec::with_capacity(batch.len());
                    for (position, record) in batch.iter().enumerate() {
                        if existing.iter().any(|fields| record.matches(fields)) {
                            tracing::debug!(source_id = %record.report_id(), "Record already exists, skipping");
                            report.record_skip();
                        } else if pending.iter().any(|(_, earlier)| record.matches(&earlier.data)) {
                            tracing::debug!(source_id = %record.report_id(), "Duplicate of an earlier record in this batch, skipping");
                            report.record_skip();
                        } else {
                            pending.push((offset + position, record));
                        }
                    }
                    pending
                }
                Err(e) => {
                    let message = e.to_string();
                    for (position, record) in batch.iter().enumerate() {
                        report.record_failure(RecordError::new(
                            record.report_id(),
                            offset + position,
                            OP_EXISTENCE_CHECK,
                            message.clone(),
                        ));
                    }
                    return;
                }
            }
        } else {
            batch
                .iter()
                .enumerate()
                .map(|(position, record)| (offset + position, record))
                .collect()
        };

        if pending.is_empty() {
            return;
        }

        let payloads = pending.iter().map(|(_, record)| record.data.clone()).collect();
        let result = self.engine.create_many(&task.collection, payloads).await;

        report.record_success(result.success_count);
        for failure in result.failures {
            let (index, record_id) = pending
                .get(failure.index)
                .map(|(index, record)| (*index, record.report_id()))
                .unwrap_or((offset + failure.index, String::new()));
            report.record_failure(RecordError::new(record_id, index, OP_CREATE, failure.error));
        }
    }

    /// Non-metadata fields of every destination record
    async fn destination_snapshot(&self, collection: &str) -> Result<Vec<Map<String, Value>>> {
        let page = self.destination.all(collection).await?;
        Ok(page.items.into_iter().map(|record| record.data).collect())
    }
}

impl PocketBaseClient {
    /// Migrates `task.collection` from this instance into the task's destination
    pub async fn migrate_collection(&self, task: &MigrationTask) -> Result<MigrationReport> {
        task.validate()?;
        let destination = PocketBaseClient::from_config(&task.destination_config())?;
        MigrationPipeline::new(self.clone(), destination).run(task).await
    }
}
