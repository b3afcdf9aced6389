//! Core business logic
//!
//! - [`bulk`] - bounded concurrent bulk operations
//! - [`migration`] - collection migration between instances
//!
//! # Migration Workflow
//!
//! 1. **Validate**: check the task before any network call
//! 2. **Connect-check**: list the destination collection
//! 3. **Extract**: list the whole source collection and strip metadata
//! 4. **Batch**: for each chunk, optionally skip existing records, then
//!    create the rest through the bulk engine
//! 5. **Report**: counts, per-record errors, elapsed time and a summary

pub mod bulk;
pub mod migration;
