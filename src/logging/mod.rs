//! Logging and observability
//!
//! Structured logging through `tracing`, with:
//! - configurable log levels
//! - console output
//! - optional JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use pbkit::logging::init_logging;
//! use pbkit::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(collection = "invoices", "Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log progress through a migration's batches
///
/// # Example
///
/// ```no_run
/// use pbkit::log_batch_processing;
///
/// log_batch_processing!(2, 3);
/// ```
#[macro_export]
macro_rules! log_batch_processing {
    ($current:expr, $total:expr) => {
        tracing::debug!(
            current = $current,
            total = $total,
            progress_pct = ($current as f64 / $total as f64 * 100.0),
            "Processing batch"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use pbkit::log_error_with_context;
/// use pbkit::domain::PbError;
///
/// let error = PbError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
