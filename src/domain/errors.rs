//! Domain error types
//!
//! This module defines the error hierarchy for pbkit. Errors don't expose
//! third-party HTTP client types; transport failures are reduced to
//! [`TransportError`] before they leave the adapter layer.

use thiserror::Error;

/// Main pbkit error type
///
/// This is the primary error type used throughout the library.
#[derive(Debug, Error)]
pub enum PbError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Local validation errors (raised before any network call)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Errors returned by the HTTP transport
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Destination or source could not be reached during a pre-flight check
    #[error("Connection error: {0}")]
    Connection(String),

    /// A filtered query matched nothing
    #[error("no records found")]
    NoRecordsFound,

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl PbError {
    /// HTTP status carried by the error, if the remote answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            PbError::Transport(TransportError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// True when the remote replied 404
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Transport-level failure classification
///
/// Either the request never produced a response, or the backend answered
/// with a status code of 400 or above.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request could not be built, sent or read
    #[error("request failed: {0}")]
    Network(String),

    /// The backend responded with status >= 400
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

// Conversion from std::io::Error
impl From<std::io::Error> for PbError {
    fn from(err: std::io::Error) -> Self {
        PbError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for PbError {
    fn from(err: serde_json::Error) -> Self {
        PbError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for PbError {
    fn from(err: toml::de::Error) -> Self {
        PbError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pb_error_display() {
        let err = PbError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_status_error_display_matches_backend_shape() {
        let err: PbError = TransportError::Status {
            status: 404,
            body: r#"{"message":"not found"}"#.to_string(),
        }
        .into();
        assert_eq!(err.to_string(), r#"HTTP 404: {"message":"not found"}"#);
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_network_error_has_no_status() {
        let err: PbError = TransportError::Network("connection refused".to_string()).into();
        assert!(err.status().is_none());
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_no_records_found_display() {
        assert_eq!(PbError::NoRecordsFound.to_string(), "no records found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: PbError = io_err.into();
        assert!(matches!(err, PbError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: PbError = json_err.into();
        assert!(matches!(err, PbError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: PbError = toml_err.into();
        assert!(matches!(err, PbError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_pb_error_implements_std_error() {
        let err = PbError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
