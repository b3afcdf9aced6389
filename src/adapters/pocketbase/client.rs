//! Record CRUD client
//!
//! [`PocketBaseClient`] maps single-record operations onto the REST surface
//! and hands bulk work to [`BulkEngine`]. It is cheap to clone; clones share
//! the transport and the auth state.

use super::auth::AuthStore;
use super::filter::{build_filter, ListQuery};
use super::models::{decode_body, ListResponse};
use super::transport::{HttpMethod, HttpTransport, Transport, DEFAULT_TIMEOUT};
use crate::config::InstanceConfig;
use crate::core::bulk::{BulkEngine, BulkResult};
use crate::domain::{strip_reserved, CollectionName, PbError, Record, RecordId, Result, UpsertItem};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Client for one backend instance
#[derive(Clone)]
pub struct PocketBaseClient {
    transport: Arc<dyn Transport>,
    auth: AuthStore,
    auth_collection: String,
}

impl PocketBaseClient {
    /// Creates a client for `base_url` authenticated with `token`
    ///
    /// An empty token leaves the client unauthenticated.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pbkit::adapters::pocketbase::PocketBaseClient;
    ///
    /// # async fn example() -> pbkit::domain::Result<()> {
    /// let client = PocketBaseClient::new("https://xxx.pockethost.io", "your_jwt_token")?;
    /// let page = client.all("traffic_optimizer").await?;
    /// println!("{} records", page.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let auth = AuthStore::default();
        let token = token.into();
        if !token.is_empty() {
            auth.set_token(token);
        }
        let transport = HttpTransport::new(base_url, DEFAULT_TIMEOUT, auth.clone())?;
        Ok(Self {
            transport: Arc::new(transport),
            auth,
            auth_collection: "users".to_string(),
        })
    }

    /// Creates a client from an instance section of the configuration
    pub fn from_config(config: &InstanceConfig) -> Result<Self> {
        let auth = AuthStore::default();
        let transport = HttpTransport::from_config(config, auth.clone())?;
        Ok(Self {
            transport: Arc::new(transport),
            auth,
            auth_collection: config.auth_collection.clone(),
        })
    }

    /// Creates a client over an arbitrary transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            auth: AuthStore::default(),
            auth_collection: "users".to_string(),
        }
    }

    /// Overrides the collection used by the auth helpers
    pub fn with_auth_collection(mut self, collection: impl Into<String>) -> Self {
        self.auth_collection = collection.into();
        self
    }

    /// Base URL of the instance
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    pub(crate) fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub(crate) fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub(crate) fn auth_collection(&self) -> &str {
        &self.auth_collection
    }

    pub(crate) fn records_path(collection: &str) -> Result<String> {
        let collection = CollectionName::new(collection).map_err(PbError::Validation)?;
        Ok(format!("/api/collections/{collection}/records"))
    }

    pub(crate) fn record_path(collection: &str, id: &str) -> Result<String> {
        let id = RecordId::new(id).map_err(PbError::Validation)?;
        Ok(format!("{}/{id}", Self::records_path(collection)?))
    }

    /// Creates a record and returns it as stored by the backend
    ///
    /// Reserved metadata fields are removed from `data` before sending.
    pub async fn create_record(&self, collection: &str, data: Map<String, Value>) -> Result<Record> {
        let path = Self::records_path(collection)?;
        let body = Value::Object(strip_reserved(data));
        let bytes = self
            .transport
            .request(HttpMethod::Post, &path, Some(&body))
            .await?;
        decode_body(&bytes, "create record")
    }

    /// Fetches one record by ID
    pub async fn get_record(&self, collection: &str, id: &str) -> Result<Record> {
        let path = Self::record_path(collection, id)?;
        let bytes = self.transport.request(HttpMethod::Get, &path, None).await?;
        decode_body(&bytes, "get record")
    }

    /// Lists records with explicit query parameters
    pub async fn list(&self, collection: &str, query: &ListQuery) -> Result<ListResponse> {
        let path = format!("{}{}", Self::records_path(collection)?, query.to_query_string());
        let bytes = self.transport.request(HttpMethod::Get, &path, None).await?;
        decode_body(&bytes, "list records")
    }

    /// Fetches every record matching all equality `filters`
    ///
    /// # Errors
    ///
    /// Returns [`PbError::NoRecordsFound`] when the query succeeds but
    /// matches nothing.
    pub async fn get_records(
        &self,
        collection: &str,
        filters: &[(String, Value)],
    ) -> Result<ListResponse> {
        let query = ListQuery::all().with_filter(build_filter(filters));
        let page = self.list(collection, &query).await?;
        if page.is_empty() {
            return Err(PbError::NoRecordsFound);
        }
        Ok(page)
    }

    /// Fetches the whole collection in one page
    pub async fn all(&self, collection: &str) -> Result<ListResponse> {
        self.list(collection, &ListQuery::all()).await
    }

    /// Updates a record and returns its new state
    ///
    /// Reserved metadata fields, including `id`, are removed from `data`.
    pub async fn update_record(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<Record> {
        let path = Self::record_path(collection, id)?;
        let body = Value::Object(strip_reserved(data));
        let bytes = self
            .transport
            .request(HttpMethod::Patch, &path, Some(&body))
            .await?;
        decode_body(&bytes, "update record")
    }

    /// Deletes a record
    pub async fn delete_record(&self, collection: &str, id: &str) -> Result<()> {
        let path = Self::record_path(collection, id)?;
        self.transport
            .request(HttpMethod::Delete, &path, None)
            .await?;
        Ok(())
    }

    fn bulk(&self) -> BulkEngine {
        BulkEngine::new(self.clone())
    }

    /// Creates many records concurrently, see [`BulkEngine::create_many`]
    pub async fn create_many(&self, collection: &str, records: Vec<Map<String, Value>>) -> BulkResult {
        self.bulk().create_many(collection, records).await
    }

    /// Updates many records concurrently, see [`BulkEngine::update_many`]
    pub async fn update_many(&self, collection: &str, updates: Vec<Map<String, Value>>) -> BulkResult {
        self.bulk().update_many(collection, updates).await
    }

    /// Deletes many records concurrently, see [`BulkEngine::delete_many`]
    pub async fn delete_many(&self, collection: &str, ids: Vec<String>) -> BulkResult {
        self.bulk().delete_many(collection, ids).await
    }

    /// Upserts many records concurrently, see [`BulkEngine::upsert_many`]
    pub async fn upsert_many(&self, collection: &str, items: Vec<UpsertItem>) -> BulkResult {
        self.bulk().upsert_many(collection, items).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(
            PocketBaseClient::records_path("invoices").unwrap(),
            "/api/collections/invoices/records"
        );
        assert_eq!(
            PocketBaseClient::record_path("invoices", "abc123").unwrap(),
            "/api/collections/invoices/records/abc123"
        );
    }

    #[test]
    fn test_paths_reject_bad_input() {
        assert!(matches!(
            PocketBaseClient::records_path(""),
            Err(PbError::Validation(_))
        ));
        assert!(PocketBaseClient::record_path("invoices", "../x").is_err());
    }

    #[test]
    fn test_new_sets_token() {
        let client = PocketBaseClient::new("https://example.com", "jwt").unwrap();
        assert_eq!(client.auth().token().as_deref(), Some("jwt"));
        assert_eq!(client.base_url(), "https://example.com");

        let anonymous = PocketBaseClient::new("https://example.com", "").unwrap();
        assert!(anonymous.auth().token().is_none());
    }
}
