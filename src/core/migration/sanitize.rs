//! Record sanitization and duplicate matching

use crate::domain::{is_reserved, strip_reserved, Record};
use serde_json::{Map, Value};

/// A source record ready to be replayed into the destination
///
/// Only `data` is sent. The source ID and stamps are kept for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationRecord {
    pub source_id: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub data: Map<String, Value>,
}

impl MigrationRecord {
    /// Source ID for error reports, empty if the source gave none
    pub fn report_id(&self) -> String {
        self.source_id.clone().unwrap_or_default()
    }

    /// True if `existing` holds exactly the same non-metadata fields
    pub fn matches(&self, existing: &Map<String, Value>) -> bool {
        fields_match(&self.data, existing)
    }
}

/// Splits a fetched record into payload and informational metadata
pub fn sanitize_record(record: Record) -> MigrationRecord {
    MigrationRecord {
        source_id: record.id,
        created: record.created,
        updated: record.updated,
        data: strip_reserved(record.data),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Compares two field maps by their string forms, ignoring metadata
pub fn fields_match(candidate: &Map<String, Value>, existing: &Map<String, Value>) -> bool {
    let field_count = |map: &Map<String, Value>| map.keys().filter(|key| !is_reserved(key)).count();
    if field_count(candidate) != field_count(existing) {
        return false;
    }

    existing
        .iter()
        .filter(|(key, _)| !is_reserved(key))
        .all(|(key, value)| {
            candidate
                .get(key)
                .map(|candidate_value| stringify(candidate_value) == stringify(value))
                .unwrap_or(false)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_sanitize_keeps_metadata_aside() {
        let record: Record = serde_json::from_value(json!({
            "id": "src000000000001",
            "collectionId": "c1",
            "collectionName": "invoices",
            "created": "2025-01-20 10:00:00.000Z",
            "updated": "2025-01-21 10:00:00.000Z",
            "number": "INV-001"
        }))
        .unwrap();

        let sanitized = sanitize_record(record);
        assert_eq!(sanitized.source_id.as_deref(), Some("src000000000001"));
        assert_eq!(sanitized.created.as_deref(), Some("2025-01-20 10:00:00.000Z"));
        assert_eq!(sanitized.data, map(json!({"number": "INV-001"})));
    }

    #[test]
    fn test_match_ignores_metadata_and_compares_strings() {
        let candidate = map(json!({"number": "INV-001", "amount": 10}));
        let existing = map(json!({"id": "dst000000000001", "number": "INV-001", "amount": "10"}));
        assert!(fields_match(&candidate, &existing));
    }

    #[test]
    fn test_match_rejects_different_values_or_keys() {
        let candidate = map(json!({"number": "INV-001", "amount": 10}));
        assert!(!fields_match(&candidate, &map(json!({"number": "INV-001", "amount": 11}))));
        assert!(!fields_match(&candidate, &map(json!({"number": "INV-001"}))));
        assert!(!fields_match(
            &candidate,
            &map(json!({"number": "INV-001", "amount": 10, "extra": true}))
        ));
    }

    #[test]
    fn test_nested_values_compared_as_json() {
        let candidate = map(json!({"tags": ["a", "b"]}));
        assert!(fields_match(&candidate, &map(json!({"tags": ["a", "b"]}))));
        assert!(!fields_match(&candidate, &map(json!({"tags": ["b", "a"]}))));
    }
}
