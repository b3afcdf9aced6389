//! Authentication helpers
//!
//! Thin wrappers over the auth-collection endpoints. A successful login or
//! refresh stores the token in the client's [`AuthStore`], which the HTTP
//! transport reads on every request.

use super::client::PocketBaseClient;
use super::models::decode_body;
use super::transport::HttpMethod;
use crate::config::{secret_string, SecretString};
use crate::domain::{PbError, Result};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct AuthState {
    token: Option<SecretString>,
    record_id: Option<String>,
}

/// Shared, thread-safe auth state
///
/// Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct AuthStore {
    inner: Arc<RwLock<AuthState>>,
}

impl AuthStore {
    /// Stores a bearer token
    pub fn set_token(&self, token: String) {
        let mut state = self.inner.write().unwrap_or_else(|e| e.into_inner());
        state.token = Some(secret_string(token));
    }

    /// Current bearer token, if any
    pub fn token(&self) -> Option<String> {
        let state = self.inner.read().unwrap_or_else(|e| e.into_inner());
        state
            .token
            .as_ref()
            .map(|t| AsRef::<str>::as_ref(t.expose_secret()).to_string())
    }

    fn set_session(&self, token: String, record_id: String) {
        let mut state = self.inner.write().unwrap_or_else(|e| e.into_inner());
        state.token = Some(secret_string(token));
        state.record_id = Some(record_id);
    }

    fn record_id(&self) -> Option<String> {
        let state = self.inner.read().unwrap_or_else(|e| e.into_inner());
        state.record_id.clone()
    }

    /// Forgets the token and the authenticated record
    pub fn clear(&self) {
        let mut state = self.inner.write().unwrap_or_else(|e| e.into_inner());
        state.token = None;
        state.record_id = None;
    }
}

/// Fields for creating a new account
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// An auth-collection record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthRecord {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub verified: bool,
    /// Every other field the collection defines
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Token plus the record it was issued for
///
/// `token` is empty when the account was created but could not log in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: String,
    pub record: AuthRecord,
}

impl PocketBaseClient {
    fn auth_path(&self, action: &str) -> String {
        format!("/api/collections/{}/{action}", self.auth_collection())
    }

    fn store_session(&self, response: &AuthResponse) {
        if !response.token.is_empty() {
            self.auth()
                .set_session(response.token.clone(), response.record.id.clone());
        }
    }

    /// Creates an account and then logs in with it
    ///
    /// A failed follow-up login is logged and reported as an empty token
    /// rather than an error, since the account itself exists.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse> {
        let path = Self::records_path(self.auth_collection())?;
        let body = serde_json::to_value(&request)?;
        let bytes = self
            .transport()
            .request(HttpMethod::Post, &path, Some(&body))
            .await?;
        let record: AuthRecord = decode_body(&bytes, "register")?;

        match self.login(&request.email, &request.password).await {
            Ok(response) => Ok(response),
            Err(e) => {
                tracing::warn!(
                    record_id = %record.id,
                    error = %e,
                    "Account created but password login failed"
                );
                Ok(AuthResponse {
                    token: String::new(),
                    record,
                })
            }
        }
    }

    /// Authenticates with identity (email or username) and password
    pub async fn login(&self, identity: &str, password: &str) -> Result<AuthResponse> {
        let body = json!({ "identity": identity, "password": password });
        let bytes = self
            .transport()
            .request(HttpMethod::Post, &self.auth_path("auth-with-password"), Some(&body))
            .await
            .map_err(|e| PbError::Authentication(format!("login failed: {e}")))?;

        let response: AuthResponse = decode_body(&bytes, "login")?;
        self.store_session(&response);
        tracing::info!(record_id = %response.record.id, "Authenticated");
        Ok(response)
    }

    /// Exchanges the current token for a fresh one
    pub async fn refresh_auth(&self) -> Result<AuthResponse> {
        if !self.is_authenticated() {
            return Err(PbError::Authentication("not authenticated".to_string()));
        }
        let bytes = self
            .transport()
            .request(HttpMethod::Post, &self.auth_path("auth-refresh"), None)
            .await
            .map_err(|e| PbError::Authentication(format!("token refresh failed: {e}")))?;

        let response: AuthResponse = decode_body(&bytes, "auth refresh")?;
        self.store_session(&response);
        Ok(response)
    }

    /// Fetches the record of the logged-in account
    pub async fn current_user(&self) -> Result<AuthRecord> {
        let id = self
            .auth()
            .record_id()
            .ok_or_else(|| PbError::Authentication("no authenticated user".to_string()))?;
        let path = Self::record_path(self.auth_collection(), &id)?;
        let bytes = self.transport().request(HttpMethod::Get, &path, None).await?;
        decode_body(&bytes, "current user")
    }

    /// Updates fields on an account record
    pub async fn update_user(&self, id: &str, updates: Map<String, Value>) -> Result<AuthRecord> {
        let path = Self::record_path(self.auth_collection(), id)?;
        let body = Value::Object(updates);
        let bytes = self
            .transport()
            .request(HttpMethod::Patch, &path, Some(&body))
            .await?;
        decode_body(&bytes, "update user")
    }

    /// Asks the backend to email a password-reset link
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        let body = json!({ "email": email });
        self.transport()
            .request(
                HttpMethod::Post,
                &self.auth_path("request-password-reset"),
                Some(&body),
            )
            .await?;
        Ok(())
    }

    /// Drops the local session; nothing is sent to the backend
    pub fn logout(&self) {
        self.auth().clear();
    }

    /// True if a token is held
    pub fn is_authenticated(&self) -> bool {
        self.auth().token().is_some()
    }

    /// The held token, if any
    pub fn auth_token(&self) -> Option<String> {
        self.auth().token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_store_shared_between_clones() {
        let store = AuthStore::default();
        let clone = store.clone();
        store.set_token("abc".to_string());
        assert_eq!(clone.token().as_deref(), Some("abc"));

        clone.clear();
        assert!(store.token().is_none());
    }

    #[test]
    fn test_register_request_serializes_camel_case() {
        let request = RegisterRequest {
            username: "demo".to_string(),
            email: "demo@example.com".to_string(),
            password: "pw".to_string(),
            password_confirm: "pw".to_string(),
            name: String::new(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["passwordConfirm"], json!("pw"));
        assert!(value.get("name").is_none());
    }

    #[test]
    fn test_auth_response_keeps_extra_fields() {
        let response: AuthResponse = serde_json::from_value(json!({
            "token": "t",
            "record": {"id": "u1", "email": "a@b.c", "avatar": "x.png"}
        }))
        .unwrap();
        assert_eq!(response.record.email, "a@b.c");
        assert_eq!(response.record.extra["avatar"], json!("x.png"));
    }

    #[test]
    fn test_logout_clears_session() {
        let client = PocketBaseClient::new("https://example.com", "jwt").unwrap();
        assert!(client.is_authenticated());
        client.logout();
        assert!(!client.is_authenticated());
        assert!(client.auth_token().is_none());
    }
}
