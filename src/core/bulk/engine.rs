//! Bulk create, update, delete and upsert
//!
//! Each operation turns its input into one unit of work per item and hands
//! the batch to a [`BoundedExecutor`]. Per-item failures never abort sibling
//! items; they come back in the [`BulkResult`].

use super::executor::{BoundedExecutor, Unit, UnitFailure, UnitResult};
use super::result::BulkResult;
use crate::adapters::pocketbase::PocketBaseClient;
use crate::domain::{Record, UpsertItem};
use futures::FutureExt;
use serde_json::{Map, Value};

/// Fans bulk calls out over a client
#[derive(Clone)]
pub struct BulkEngine {
    client: PocketBaseClient,
    executor: BoundedExecutor,
}

impl BulkEngine {
    /// Creates an engine with the default concurrency ceiling
    pub fn new(client: PocketBaseClient) -> Self {
        Self {
            client,
            executor: BoundedExecutor::default(),
        }
    }

    /// Replaces the executor
    pub fn with_executor(mut self, executor: BoundedExecutor) -> Self {
        self.executor = executor;
        self
    }

    async fn execute(&self, operation: &str, collection: &str, units: Vec<Unit>) -> BulkResult {
        if units.is_empty() {
            return BulkResult::empty();
        }

        let outcomes = self.executor.run(units).await;
        let result = BulkResult::from_outcomes(outcomes);

        tracing::info!(
            operation = operation,
            collection = collection,
            total = result.total_count,
            succeeded = result.success_count,
            failed = result.failure_count,
            "Bulk operation completed"
        );

        result
    }

    /// Creates every record; success carries the backend-assigned ID and the
    /// item's input index
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pbkit::adapters::pocketbase::PocketBaseClient;
    /// use pbkit::core::bulk::BulkEngine;
    /// use serde_json::json;
    ///
    /// # async fn example() -> pbkit::domain::Result<()> {
    /// let client = PocketBaseClient::new("https://xxx.pockethost.io", "token")?;
    /// let records = vec![
    ///     json!({"amount": 10}).as_object().cloned().unwrap_or_default(),
    ///     json!({"amount": 20}).as_object().cloned().unwrap_or_default(),
    /// ];
    /// let result = BulkEngine::new(client).create_many("invoices", records).await;
    /// println!("{}/{} created", result.success_count, result.total_count);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_many(&self, collection: &str, records: Vec<Map<String, Value>>) -> BulkResult {
        let units = records
            .into_iter()
            .map(|data| {
                let client = self.client.clone();
                let collection = collection.to_string();
                async move { create_unit(&client, &collection, data).await }.boxed()
            })
            .collect();

        self.execute("create", collection, units).await
    }

    /// Updates every record named by its `id` field
    ///
    /// An item without a usable `id` fails locally and makes no request.
    /// The `id` is not repeated in the request body.
    pub async fn update_many(&self, collection: &str, updates: Vec<Map<String, Value>>) -> BulkResult {
        let units = updates
            .into_iter()
            .map(|data| {
                let client = self.client.clone();
                let collection = collection.to_string();
                async move { update_unit(&client, &collection, data).await }.boxed()
            })
            .collect();

        self.execute("update", collection, units).await
    }

    /// Deletes every record by ID
    pub async fn delete_many(&self, collection: &str, ids: Vec<String>) -> BulkResult {
        let units = ids
            .into_iter()
            .map(|id| {
                let client = self.client.clone();
                let collection = collection.to_string();
                async move {
                    match client.delete_record(&collection, &id).await {
                        Ok(()) => Ok(Some(id)),
                        Err(e) => Err(UnitFailure::new(Some(id), e.to_string())),
                    }
                }
                .boxed()
            })
            .collect();

        self.execute("delete", collection, units).await
    }

    /// Updates items that carry an ID, creating them if the update fails
    ///
    /// Items without an ID are created directly. The fallback create runs in
    /// the same unit as the update, after the update has failed.
    pub async fn upsert_many(&self, collection: &str, items: Vec<UpsertItem>) -> BulkResult {
        let units = items
            .into_iter()
            .map(|item| {
                let client = self.client.clone();
                let collection = collection.to_string();
                async move { upsert_unit(&client, &collection, item).await }.boxed()
            })
            .collect();

        self.execute("upsert", collection, units).await
    }
}

fn created_id(record: Record) -> Option<String> {
    if record.id.is_none() {
        tracing::warn!("Create response carried no record ID");
    }
    record.id
}

async fn create_unit(client: &PocketBaseClient, collection: &str, data: Map<String, Value>) -> UnitResult {
    client
        .create_record(collection, data)
        .await
        .map(created_id)
        .map_err(|e| UnitFailure::new(None, e.to_string()))
}

async fn update_unit(client: &PocketBaseClient, collection: &str, mut data: Map<String, Value>) -> UnitResult {
    let id = match data.remove("id") {
        Some(Value::String(id)) if !id.is_empty() => id,
        Some(Value::String(_)) | Some(Value::Null) | None => {
            return Err(UnitFailure::new(None, "update: item has no 'id' field"));
        }
        Some(other) => {
            return Err(UnitFailure::new(
                None,
                format!("update: 'id' must be a string, got {other}"),
            ));
        }
    };

    match client.update_record(collection, &id, data).await {
        Ok(_) => Ok(Some(id)),
        Err(e) => Err(UnitFailure::new(Some(id), e.to_string())),
    }
}

enum UpsertStep {
    TryUpdate { id: String },
    TryCreate { update_error: Option<String> },
}

async fn upsert_unit(client: &PocketBaseClient, collection: &str, item: UpsertItem) -> UnitResult {
    let UpsertItem { id, data } = item;
    let supplied_id = id.filter(|id| !id.is_empty());

    let mut step = match supplied_id.clone() {
        Some(id) => UpsertStep::TryUpdate { id },
        None => UpsertStep::TryCreate { update_error: None },
    };

    loop {
        step = match step {
            UpsertStep::TryUpdate { id } => match client.update_record(collection, &id, data.clone()).await {
                Ok(_) => return Ok(Some(id)),
                Err(e) => {
                    tracing::debug!(record_id = %id, error = %e, "Upsert update failed, trying create");
                    UpsertStep::TryCreate {
                        update_error: Some(e.to_string()),
                    }
                }
            },
            UpsertStep::TryCreate { update_error } => {
                return match client.create_record(collection, data).await {
                    Ok(record) => Ok(created_id(record)),
                    Err(e) => Err(match update_error {
                        Some(update_error) => UnitFailure::new(
                            supplied_id,
                            format!("update failed: {update_error}; create fallback failed: {e}"),
                        ),
                        None => UnitFailure::new(None, e.to_string()),
                    }),
                };
            }
        };
    }
}
