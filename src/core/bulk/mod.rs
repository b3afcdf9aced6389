//! Bulk operations
//!
//! - [`executor`] - bounded concurrent execution of independent units
//! - [`engine`] - create, update, delete and upsert over many records
//! - [`result`] - per-item aggregation

pub mod engine;
pub mod executor;
pub mod result;

pub use engine::BulkEngine;
pub use executor::{BoundedExecutor, Unit, UnitFailure, UnitOutcome, UnitResult, MAX_CONCURRENCY};
pub use result::{BulkFailure, BulkResult, BulkSuccess};
