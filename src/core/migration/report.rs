//! Migration report
//!
//! Tracks per-record outcomes across batches and renders the final summary.

use std::time::Duration;

/// Operation name for a failed destination lookup
pub const OP_EXISTENCE_CHECK: &str = "existence_check";

/// Operation name for a failed create
pub const OP_CREATE: &str = "create";

/// One record that could not be migrated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordError {
    /// Source record ID
    pub record_id: String,

    /// Zero-based position in the extracted source list
    pub index: usize,

    /// Failing operation, [`OP_EXISTENCE_CHECK`] or [`OP_CREATE`]
    pub operation: String,

    /// Error text as reported by the transport
    pub error: String,
}

impl RecordError {
    pub fn new(record_id: String, index: usize, operation: &str, error: String) -> Self {
        Self {
            record_id,
            index,
            operation: operation.to_string(),
            error,
        }
    }
}

/// Outcome of one migration run
#[derive(Debug, Clone, Default)]
pub struct MigrationReport {
    /// Records extracted from the source
    pub total_records: usize,

    /// Records created in the destination
    pub successful_records: usize,

    /// Records that failed a lookup or a create
    pub failed_records: usize,

    /// Records already present in the destination
    pub skipped_records: usize,

    /// Batches processed
    pub batches: usize,

    /// Per-record failures, in the order they were recorded
    pub errors: Vec<RecordError>,

    /// Wall-clock time of the whole run
    pub processing_time: Duration,

    pub source_collection: String,
    pub destination_collection: String,

    /// One-line human-readable outcome
    pub summary: String,
}

impl MigrationReport {
    /// Creates an empty report for `collection`
    pub fn new(collection: &str) -> Self {
        Self {
            source_collection: collection.to_string(),
            destination_collection: collection.to_string(),
            ..Default::default()
        }
    }

    pub fn record_success(&mut self, count: usize) {
        self.successful_records += count;
    }

    pub fn record_skip(&mut self) {
        self.skipped_records += 1;
    }

    pub fn record_failure(&mut self, error: RecordError) {
        self.failed_records += 1;
        self.errors.push(error);
    }

    /// Report for a source collection with nothing in it
    pub fn empty(collection: &str, processing_time: Duration) -> Self {
        let mut report = Self::new(collection);
        report.processing_time = processing_time;
        report.summary = format!("No records found in collection '{collection}'");
        report
    }

    /// Stamps the elapsed time and writes the summary line
    pub fn finalize(&mut self, processing_time: Duration) {
        self.processing_time = processing_time;
        self.summary = format!(
            "{}/{} records successfully migrated",
            self.successful_records, self.total_records
        );
        if self.skipped_records > 0 {
            self.summary.push_str(&format!(" ({} skipped)", self.skipped_records));
        }
    }

    /// True if no record failed
    pub fn is_successful(&self) -> bool {
        self.failed_records == 0
    }

    /// Share of records that were created or skipped, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_records == 0 {
            return 100.0;
        }
        ((self.successful_records + self.skipped_records) as f64 / self.total_records as f64) * 100.0
    }

    pub fn log_summary(&self) {
        tracing::info!(
            collection = %self.source_collection,
            total = self.total_records,
            successful = self.successful_records,
            failed = self.failed_records,
            skipped = self.skipped_records,
            batches = self.batches,
            duration_ms = self.processing_time.as_millis() as u64,
            success_rate = format!("{:.2}%", self.success_rate()),
            "Migration completed"
        );

        if !self.errors.is_empty() {
            tracing::warn!(error_count = self.errors.len(), "Migration completed with errors");
            for error in &self.errors {
                tracing::warn!(
                    record_id = %error.record_id,
                    index = error.index,
                    operation = %error.operation,
                    error = %error.error,
                    "Record not migrated"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report_names_both_sides() {
        let report = MigrationReport::new("invoices");
        assert_eq!(report.source_collection, "invoices");
        assert_eq!(report.destination_collection, "invoices");
        assert_eq!(report.total_records, 0);
    }

    #[test]
    fn test_finalize_summary() {
        let mut report = MigrationReport::new("invoices");
        report.total_records = 10;
        report.record_success(7);
        report.record_skip();
        report.record_failure(RecordError::new("a".to_string(), 3, OP_CREATE, "HTTP 400: bad".to_string()));
        report.record_failure(RecordError::new("b".to_string(), 4, OP_CREATE, "HTTP 400: bad".to_string()));
        report.finalize(Duration::from_millis(1500));

        assert_eq!(report.summary, "7/10 records successfully migrated (1 skipped)");
        assert_eq!(report.processing_time, Duration::from_millis(1500));
        assert_eq!(
            report.successful_records + report.failed_records + report.skipped_records,
            report.total_records
        );
        assert!(!report.is_successful());
        assert_eq!(report.success_rate(), 80.0);
    }

    #[test]
    fn test_empty_report() {
        let report = MigrationReport::empty("invoices", Duration::from_millis(5));
        assert!(report.is_successful());
        assert_eq!(report.success_rate(), 100.0);
        assert!(report.summary.contains("No records found"));
    }
}
