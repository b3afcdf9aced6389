//! Domain models and types for pbkit.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Records** ([`Record`], [`UpsertItem`]) and the reserved metadata rules
//! - **Identifiers** ([`CollectionName`], [`RecordId`])
//! - **Timestamps** in the backend's text format ([`PocketBaseTime`])
//! - **Error types** ([`PbError`], [`TransportError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, PbError>`]:
//!
//! ```rust
//! use pbkit::domain::{PbError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = pbkit::config::load_config("pbkit.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod record;
pub mod result;
pub mod time;

pub use errors::{PbError, TransportError};
pub use ids::{CollectionName, RecordId};
pub use record::{is_reserved, strip_reserved, Record, UpsertItem, RESERVED_FIELDS};
pub use result::Result;
pub use time::{normalize_timestamps, parse_timestamp, PocketBaseTime};
