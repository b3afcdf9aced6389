//! Result type alias for pbkit

use super::errors::PbError;

/// Result type alias for pbkit operations
///
/// # Examples
///
/// ```
/// use pbkit::domain::result::Result;
/// use pbkit::domain::errors::PbError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(PbError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, PbError>;
