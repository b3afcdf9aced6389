// pbkit - PocketBase client and collection migration tool
// Copyright (c) 2025 pbkit Contributors
// Licensed under the MIT License

//! # pbkit - PocketBase client SDK
//!
//! A client for the PocketBase REST API with concurrent bulk operations and
//! a cross-instance collection migration pipeline.
//!
//! ## Overview
//!
//! - **CRUD** on records through [`adapters::pocketbase::PocketBaseClient`]
//! - **Bulk** create, update, delete and upsert with at most
//!   [`core::bulk::MAX_CONCURRENCY`] requests in flight
//! - **Migration** of a whole collection from one instance to another, with
//!   optional duplicate skipping
//! - **Auth** helpers for the password flow
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Bulk engine and migration pipeline
//! - [`adapters`] - HTTP transport and REST client
//! - [`domain`] - Records, IDs, timestamps and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pbkit::adapters::pocketbase::PocketBaseClient;
//! use pbkit::domain::UpsertItem;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PocketBaseClient::new("https://xxx.pockethost.io", "admin-token")?;
//!
//!     let data = json!({"number": "INV-003", "amount": 99.5});
//!     let items = vec![UpsertItem::new(data.as_object().cloned().unwrap_or_default())
//!         .with_id("a1b2c3d4e5f6g7h")];
//!
//!     let result = client.upsert_many("invoices", items).await;
//!     for failure in &result.failures {
//!         eprintln!("item {} failed: {}", failure.index, failure.error);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Migration
//!
//! ```rust,no_run
//! use pbkit::adapters::pocketbase::PocketBaseClient;
//! use pbkit::config::secret_string;
//! use pbkit::core::migration::MigrationTask;
//!
//! # async fn example() -> pbkit::domain::Result<()> {
//! let source = PocketBaseClient::new("https://source.pockethost.io", "source-admin")?;
//! let task = MigrationTask::new(
//!     "https://dest.pockethost.io",
//!     secret_string("dest-admin".to_string()),
//!     "invoices",
//! )
//! .with_skip_existing(true)
//! .with_batch_size(50);
//!
//! let report = source.migrate_collection(&task).await?;
//! println!("{}", report.summary);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Fallible calls return [`domain::PbError`]. Bulk calls never fail as a
//! whole; per-item errors are listed in the returned
//! [`core::bulk::BulkResult`].
//!
//! ```rust,no_run
//! use pbkit::domain::PbError;
//!
//! fn example() -> Result<(), PbError> {
//!     let config = pbkit::config::load_config("pbkit.toml")?;
//!     println!("source: {}", config.source.url);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
