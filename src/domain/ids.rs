//! Identifier types with validation
//!
//! Collection names and record IDs end up templated into request paths, so
//! both are checked for characters that would change the path structure.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of a backend-assigned record identifier
pub const RECORD_ID_LEN: usize = 15;

fn has_path_breaking_chars(value: &str) -> bool {
    value
        .chars()
        .any(|c| matches!(c, '/' | '?' | '#' | '&' | '%') || c.is_whitespace())
}

/// Collection name newtype wrapper
///
/// # Examples
///
/// ```
/// use pbkit::domain::ids::CollectionName;
/// use std::str::FromStr;
///
/// let name = CollectionName::from_str("invoices").unwrap();
/// assert_eq!(name.as_str(), "invoices");
/// assert!(CollectionName::new("bad/name").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionName(String);

impl CollectionName {
    /// Creates a new CollectionName, rejecting empty or path-breaking names
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("collection name cannot be empty".to_string());
        }
        if has_path_breaking_chars(&name) {
            return Err(format!("invalid collection name '{name}'"));
        }
        Ok(Self(name))
    }

    /// Returns the collection name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CollectionName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Record identifier newtype wrapper
///
/// Backend-assigned IDs are 15 alphanumeric characters. Construction only
/// rejects values that are unusable in a path; [`RecordId::is_canonical`]
/// reports whether the value has the backend's own shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a new RecordId
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.is_empty() {
            return Err("record id cannot be empty".to_string());
        }
        if has_path_breaking_chars(&id) {
            return Err(format!("invalid record id '{id}'"));
        }
        Ok(Self(id))
    }

    /// Whether the ID looks like one the backend would assign
    pub fn is_canonical(&self) -> bool {
        self.0.len() == RECORD_ID_LEN && self.0.chars().all(|c| c.is_ascii_alphanumeric())
    }

    /// Returns the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_name_valid() {
        let name = CollectionName::new("traffic_optimizer").unwrap();
        assert_eq!(name.as_str(), "traffic_optimizer");
        assert_eq!(name.to_string(), "traffic_optimizer");
    }

    #[test]
    fn test_collection_name_rejects_empty_and_paths() {
        assert!(CollectionName::new("").is_err());
        assert!(CollectionName::new("   ").is_err());
        assert!(CollectionName::new("users/records").is_err());
        assert!(CollectionName::new("users?x=1").is_err());
    }

    #[test]
    fn test_record_id_canonical() {
        let id = RecordId::new("a1b2c3d4e5f6g7h").unwrap();
        assert!(id.is_canonical());

        let short = RecordId::new("inv001").unwrap();
        assert!(!short.is_canonical());
    }

    #[test]
    fn test_record_id_rejects_path_breaking() {
        assert!(RecordId::new("").is_err());
        assert!(RecordId::new("abc/def").is_err());
        assert!(RecordId::new("abc def").is_err());
    }

    #[test]
    fn test_record_id_from_str() {
        let id = RecordId::from_str("abc123").unwrap();
        assert_eq!(id.into_inner(), "abc123");
    }
}
