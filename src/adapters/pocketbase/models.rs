//! Response envelopes returned by the REST API

use crate::domain::{normalize_timestamps, PbError, Record, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Paginated record listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    #[serde(default)]
    pub page: i64,

    #[serde(default)]
    pub per_page: i64,

    #[serde(default)]
    pub total_items: i64,

    #[serde(default)]
    pub total_pages: i64,

    #[serde(default)]
    pub items: Vec<Record>,
}

impl ListResponse {
    /// Number of items in this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the page holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Deserializes every item into `T`
    ///
    /// Backend-format timestamps are rewritten to RFC 3339 first, so `T` may
    /// use plain `chrono::DateTime<Utc>` fields alongside
    /// [`PocketBaseTime`](crate::domain::PocketBaseTime) ones.
    ///
    /// # Examples
    ///
    /// ```
    /// use pbkit::adapters::pocketbase::ListResponse;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Invoice {
    ///     number: String,
    ///     due_date: chrono::DateTime<chrono::Utc>,
    /// }
    ///
    /// let page: ListResponse = serde_json::from_str(r#"{
    ///     "items": [{"id": "inv001", "number": "INV-001", "due_date": "2025-02-20 00:00:00.000Z"}]
    /// }"#).unwrap();
    ///
    /// let invoices: Vec<Invoice> = page.decode_items().unwrap();
    /// assert_eq!(invoices[0].number, "INV-001");
    /// ```
    pub fn decode_items<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.items
            .iter()
            .map(|record| {
                let raw: Map<String, Value> = record.clone().into();
                serde_json::from_value(normalize_timestamps(Value::Object(raw))).map_err(|e| {
                    PbError::Serialization(format!(
                        "failed to decode record {}: {e}",
                        record.id.as_deref().unwrap_or("<unsaved>")
                    ))
                })
            })
            .collect()
    }
}

/// Decodes a JSON response body, naming the operation on failure
pub(crate) fn decode_body<T: DeserializeOwned>(bytes: &[u8], operation: &str) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        PbError::Serialization(format!("failed to unmarshal {operation} response: {e}"))
    })
}
