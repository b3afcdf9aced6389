//! PocketBase REST adapter
//!
//! - [`transport`] - the [`Transport`] seam and its reqwest implementation
//! - [`client`] - single-record CRUD and bulk entry points
//! - [`filter`] - filter expressions and list query strings
//! - [`models`] - response envelopes
//! - [`auth`] - login, refresh and account helpers

pub mod auth;
pub mod client;
pub mod filter;
pub mod models;
pub mod transport;

pub use auth::{AuthRecord, AuthResponse, AuthStore, RegisterRequest};
pub use client::PocketBaseClient;
pub use filter::{build_filter, ListQuery, UNBOUNDED_PER_PAGE};
pub use models::ListResponse;
pub use transport::{HttpMethod, HttpTransport, Transport, DEFAULT_TIMEOUT};
