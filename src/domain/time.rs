//! Backend timestamp handling
//!
//! The backend writes timestamps as `2025-01-20 10:00:00.000Z` (space instead
//! of `T`) and leaves unset datetime fields as `""`, `null` or a textual
//! placeholder. This module parses that format, offers a serde-aware
//! [`PocketBaseTime`] field type, and rewrites whole JSON trees so plain
//! `chrono` fields deserialize.

use crate::domain::{PbError, Result};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Output format used when writing timestamps back to the backend
pub const BACKEND_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3fZ";

const BACKEND_PARSE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.fZ", "%Y-%m-%d %H:%M:%S%.f"];

/// Values treated as "no timestamp"
const NULL_PLACEHOLDERS: [&str; 3] = ["", "null", "n/a"];

fn is_null_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    NULL_PLACEHOLDERS
        .iter()
        .any(|p| trimmed.eq_ignore_ascii_case(p))
}

fn parse_backend_format(value: &str) -> Option<DateTime<Utc>> {
    BACKEND_PARSE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Parses a timestamp in the backend format or RFC 3339
///
/// Null placeholders yield `Ok(None)`; anything else unparseable is an error.
///
/// # Examples
///
/// ```
/// use pbkit::domain::time::parse_timestamp;
///
/// assert!(parse_timestamp("2025-01-20 15:30:00.000Z").unwrap().is_some());
/// assert!(parse_timestamp("2025-01-20T15:30:00Z").unwrap().is_some());
/// assert!(parse_timestamp("N/A").unwrap().is_none());
/// assert!(parse_timestamp("tomorrow").is_err());
/// ```
pub fn parse_timestamp(value: &str) -> Result<Option<DateTime<Utc>>> {
    if is_null_placeholder(value) {
        return Ok(None);
    }

    let trimmed = value.trim();
    if let Some(parsed) = parse_backend_format(trimmed) {
        return Ok(Some(parsed));
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|e| PbError::Serialization(format!("invalid timestamp '{value}': {e}")))
}

/// Nullable timestamp field
///
/// Deserializes from the backend format, RFC 3339, JSON `null` or a null
/// placeholder. Serializes back in the backend format, with `None` written
/// as an empty string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PocketBaseTime(pub Option<DateTime<Utc>>);

impl PocketBaseTime {
    /// Wraps a concrete instant
    pub fn new(value: DateTime<Utc>) -> Self {
        Self(Some(value))
    }

    /// True when no timestamp was set
    pub fn is_zero(&self) -> bool {
        self.0.is_none()
    }

    /// The wrapped instant, if any
    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        self.0.as_ref()
    }
}

impl From<DateTime<Utc>> for PocketBaseTime {
    fn from(value: DateTime<Utc>) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for PocketBaseTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(dt) => write!(f, "{}", dt.format(BACKEND_FORMAT)),
            None => Ok(()),
        }
    }
}

impl Serialize for PocketBaseTime {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PocketBaseTime {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(Self(None)),
            Some(text) => parse_timestamp(&text)
                .map(Self)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// Rewrites backend-format timestamp strings to RFC 3339, recursively
///
/// Strings that are not backend-format timestamps are left untouched, so the
/// transform is safe to run over arbitrary record payloads.
pub fn normalize_timestamps(value: Value) -> Value {
    match value {
        Value::String(text) => match parse_backend_format(text.trim()) {
            Some(dt) => Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => Value::String(text),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_timestamps).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, normalize_timestamps(v)))
                .collect(),
        ),
        other => other,
    }
}
