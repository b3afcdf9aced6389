//! HTTP transport
//!
//! The [`Transport`] trait is the only seam between the SDK and the network:
//! one method, one path, an optional JSON body, and raw response bytes back.
//! [`HttpTransport`] implements it with reqwest.

use super::auth::AuthStore;
use crate::config::InstanceConfig;
use crate::domain::{PbError, Result, TransportError};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP methods used by the REST surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Upper-case method name
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Executes one request against a backend instance
///
/// Implementations must return [`TransportError::Status`] for any response
/// with status >= 400 and [`TransportError::Network`] when no response
/// could be obtained.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `body` (if any) to `path` and returns the raw response body
    async fn request(&self, method: HttpMethod, path: &str, body: Option<&Value>)
        -> Result<Vec<u8>>;

    /// Base URL of the instance this transport talks to
    fn base_url(&self) -> &str;
}

/// reqwest-backed [`Transport`]
///
/// Sends `Content-Type: application/json` on every request and a bearer
/// token whenever the shared [`AuthStore`] holds one.
pub struct HttpTransport {
    base_url: String,
    client: Client,
    auth: AuthStore,
}

impl HttpTransport {
    /// Creates a transport for `base_url` with the given per-request timeout
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the underlying HTTP client cannot
    /// be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration, auth: AuthStore) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .build()
            .map_err(|e| PbError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            auth,
        })
    }

    /// Creates a transport from an instance section of the configuration
    ///
    /// A configured token is copied into `auth`.
    pub fn from_config(config: &InstanceConfig, auth: AuthStore) -> Result<Self> {
        if let Some(ref token) = config.token {
            let token: &str = token.expose_secret().as_ref();
            if !token.is_empty() {
                auth.set_token(token.to_string());
            }
        }
        Self::new(
            config.url.clone(),
            Duration::from_secs(config.timeout_seconds),
            auth,
        )
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Vec<u8>> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .client
            .request(method.into(), &url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = self.auth.token() {
            request = request.bearer_auth(token);
        }

        if let Some(body) = body {
            let payload = serde_json::to_vec(body).map_err(|e| {
                PbError::Serialization(format!("failed to marshal request body: {e}"))
            })?;
            request = request.body(payload);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(format!("failed to read response body: {e}")))?;

        tracing::debug!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            bytes = bytes.len(),
            "Request completed"
        );

        if status.as_u16() >= 400 {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            }
            .into());
        }

        Ok(bytes.to_vec())
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
