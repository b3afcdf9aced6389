//! Cross-instance collection migration
//!
//! - [`task`] - what to migrate and where
//! - [`sanitize`] - metadata stripping and duplicate matching
//! - [`pipeline`] - the staged run
//! - [`report`] - per-record outcomes and the summary

pub mod pipeline;
pub mod report;
pub mod sanitize;
pub mod task;

pub use pipeline::MigrationPipeline;
pub use report::{MigrationReport, RecordError, OP_CREATE, OP_EXISTENCE_CHECK};
pub use sanitize::{fields_match, sanitize_record, MigrationRecord};
pub use task::{MigrationTask, DEFAULT_BATCH_SIZE};
