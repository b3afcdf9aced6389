//! Record domain model
//!
//! A record is an open field map plus the metadata the backend manages
//! itself. Metadata is read from responses but never written back.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Backend-managed field names that must never appear in a write payload
pub const RESERVED_FIELDS: [&str; 5] = ["id", "created", "updated", "collectionId", "collectionName"];

/// Returns true if `field` is backend-managed metadata
pub fn is_reserved(field: &str) -> bool {
    RESERVED_FIELDS.contains(&field)
}

/// Removes every backend-managed field from a payload map
pub fn strip_reserved(mut payload: Map<String, Value>) -> Map<String, Value> {
    for field in RESERVED_FIELDS {
        payload.remove(field);
    }
    payload
}

/// A stored record
///
/// Deserializes from the flat JSON object the backend returns, moving the
/// reserved keys out of `data`.
///
/// # Examples
///
/// ```
/// use pbkit::domain::Record;
/// use serde_json::json;
///
/// let record: Record = serde_json::from_value(json!({
///     "id": "inv001",
///     "collectionName": "invoices",
///     "number": "INV-001"
/// })).unwrap();
///
/// assert_eq!(record.id.as_deref(), Some("inv001"));
/// assert!(record.data.contains_key("number"));
/// assert!(!record.data.contains_key("collectionName"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Record {
    /// Backend-assigned identifier; `None` means not yet created
    pub id: Option<String>,

    /// Owning collection ID
    pub collection_id: Option<String>,

    /// Owning collection name
    pub collection_name: Option<String>,

    /// Creation stamp, in the backend's own text format
    pub created: Option<String>,

    /// Last update stamp, in the backend's own text format
    pub updated: Option<String>,

    /// Caller-visible fields
    pub data: Map<String, Value>,
}

impl Record {
    /// Creates an unsaved record from a field map
    pub fn new(data: Map<String, Value>) -> Self {
        Self {
            data: strip_reserved(data),
            ..Default::default()
        }
    }

    /// The fields that may be sent in a create/update body
    pub fn payload(&self) -> Map<String, Value> {
        self.data.clone()
    }

    /// Returns a field value by name
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(s)) => Some(s),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    }
}

impl From<Map<String, Value>> for Record {
    fn from(mut map: Map<String, Value>) -> Self {
        let id = take_string(&mut map, "id");
        let collection_id = take_string(&mut map, "collectionId");
        let collection_name = take_string(&mut map, "collectionName");
        let created = take_string(&mut map, "created");
        let updated = take_string(&mut map, "updated");

        Self {
            id,
            collection_id,
            collection_name,
            created,
            updated,
            data: map,
        }
    }
}

impl From<Record> for Map<String, Value> {
    fn from(record: Record) -> Self {
        let mut map = record.data;
        let metadata = [
            ("id", record.id),
            ("collectionId", record.collection_id),
            ("collectionName", record.collection_name),
            ("created", record.created),
            ("updated", record.updated),
        ];
        for (key, value) in metadata {
            if let Some(value) = value {
                map.insert(key.to_string(), Value::String(value));
            }
        }
        map
    }
}

/// Input item for an upsert
///
/// With an ID the engine tries an update first and falls back to a create;
/// without one it creates directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpsertItem {
    /// Known record ID, if any
    pub id: Option<String>,

    /// Field values to write
    pub data: Map<String, Value>,
}

impl UpsertItem {
    /// Creates an item with no known ID
    pub fn new(data: Map<String, Value>) -> Self {
        Self { id: None, data }
    }

    /// Attaches a known record ID
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}
