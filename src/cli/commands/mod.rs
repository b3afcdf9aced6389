//! CLI command implementations
//!
//! Every handler returns the process exit code.

pub mod check;
pub mod init;
pub mod migrate;
pub mod validate;

/// Exit code for a clean run
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code when some records failed
pub const EXIT_PARTIAL: i32 = 1;
/// Exit code for configuration problems
pub const EXIT_CONFIG: i32 = 2;
/// Exit code when an instance could not be reached
pub const EXIT_CONNECTION: i32 = 4;
/// Exit code for anything else
pub const EXIT_FATAL: i32 = 5;
