//! In-memory backend shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use pbkit::adapters::pocketbase::{HttpMethod, PocketBaseClient, Transport};
use pbkit::domain::{PbError, Result, TransportError};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One request seen by the fake
#[derive(Debug, Clone)]
pub struct Call {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
}

/// Records in a body with `"fail": true` are rejected on create;
/// `"panic": true` makes the transport panic.
#[derive(Default)]
pub struct FakeBackend {
    collections: Mutex<HashMap<String, Vec<Map<String, Value>>>>,
    calls: Mutex<Vec<Call>>,
    next_id: AtomicUsize,
    live: AtomicUsize,
    peak: AtomicUsize,
    delay: Duration,
    /// Successful GETs allowed before lists start failing
    list_budget: Mutex<Option<usize>>,
}

fn status(code: u16, body: &str) -> PbError {
    PbError::Transport(TransportError::Status {
        status: code,
        body: body.to_string(),
    })
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            ..Default::default()
        })
    }

    pub fn client(self: &Arc<Self>) -> PocketBaseClient {
        PocketBaseClient::with_transport(self.clone())
    }

    /// Stores a record as-is, assigning an ID if it has none
    pub fn seed(&self, collection: &str, mut record: Map<String, Value>) -> String {
        let id = match record.get("id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => {
                let id = self.fresh_id();
                record.insert("id".to_string(), json!(id));
                id
            }
        };
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .push(record);
        id
    }

    /// Makes every list after the first `allowed` ones fail with HTTP 500
    pub fn fail_lists_after(&self, allowed: usize) {
        *self.list_budget.lock().unwrap() = Some(allowed);
    }

    pub fn records(&self, collection: &str) -> Vec<Map<String, Value>> {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_with(&self, method: HttpMethod) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.method == method).collect()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn fresh_id(&self) -> String {
        format!("{:015}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn handle(&self, method: HttpMethod, path: &str, body: Option<&Value>) -> Result<Vec<u8>> {
        let path_only = path.split('?').next().unwrap_or(path);
        let segments: Vec<&str> = path_only.trim_start_matches('/').split('/').collect();
        let (collection, id) = match segments.as_slice() {
            ["api", "collections", collection, "records"] => (collection.to_string(), None),
            ["api", "collections", collection, "records", id] => (collection.to_string(), Some(id.to_string())),
            _ => return Err(status(404, "unknown route")),
        };

        let body_map = body.and_then(Value::as_object).cloned().unwrap_or_default();
        if body_map.get("panic") == Some(&json!(true)) {
            panic!("backend exploded");
        }

        let mut collections = self.collections.lock().unwrap();
        let records = collections.entry(collection).or_default();

        match (method, id) {
            (HttpMethod::Get, None) => {
                let mut budget = self.list_budget.lock().unwrap();
                if let Some(remaining) = budget.as_mut() {
                    if *remaining == 0 {
                        return Err(status(500, "list unavailable"));
                    }
                    *remaining -= 1;
                }
                let body = json!({
                    "page": 1,
                    "perPage": records.len(),
                    "totalItems": records.len(),
                    "totalPages": 1,
                    "items": records.clone(),
                });
                Ok(serde_json::to_vec(&body)?)
            }
            (HttpMethod::Get, Some(id)) => records
                .iter()
                .find(|r| r.get("id") == Some(&json!(id)))
                .map(|r| serde_json::to_vec(r).map_err(PbError::from))
                .unwrap_or_else(|| Err(status(404, "not found"))),
            (HttpMethod::Post, None) => {
                if body_map.get("fail") == Some(&json!(true)) {
                    return Err(status(400, r#"{"message":"validation failed"}"#));
                }
                let mut record = body_map;
                let id = self.fresh_id();
                record.insert("id".to_string(), json!(id));
                record.insert("created".to_string(), json!("2025-01-20 10:00:00.000Z"));
                records.push(record.clone());
                Ok(serde_json::to_vec(&record)?)
            }
            (HttpMethod::Patch, Some(id)) => match records.iter_mut().find(|r| r.get("id") == Some(&json!(id))) {
                Some(record) => {
                    for (key, value) in body_map {
                        record.insert(key, value);
                    }
                    Ok(serde_json::to_vec(record)?)
                }
                None => Err(status(404, r#"{"message":"The requested resource wasn't found."}"#)),
            },
            (HttpMethod::Delete, Some(id)) => {
                let before = records.len();
                records.retain(|r| r.get("id") != Some(&json!(id)));
                if records.len() == before {
                    Err(status(404, "not found"))
                } else {
                    Ok(Vec::new())
                }
            }
            _ => Err(status(405, "method not allowed")),
        }
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for FakeBackend {
    async fn request(&self, method: HttpMethod, path: &str, body: Option<&Value>) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });

        let now = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        let _in_flight = InFlight(&self.live);
        self.peak.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.handle(method, path, body)
    }

    fn base_url(&self) -> &str {
        "http://fake.local"
    }
}

pub fn map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}
