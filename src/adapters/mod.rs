//! External system integrations for pbkit.
//!
//! - [`pocketbase`] - REST adapter for a PocketBase instance
//!
//! # Design Pattern
//!
//! The adapter isolates the HTTP client behind the [`pocketbase::Transport`]
//! trait, so the bulk engine and the migration pipeline can be exercised
//! against in-memory transports.
//!
//! ```rust,no_run
//! use pbkit::adapters::pocketbase::PocketBaseClient;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PocketBaseClient::new("https://xxx.pockethost.io", "your_jwt_token")?;
//!
//! let mut row = serde_json::Map::new();
//! row.insert("item1".to_string(), json!("1"));
//! let created = client.create_record("traffic_optimizer", row).await?;
//!
//! let filters = [("status".to_string(), json!("active"))];
//! let page = client.get_records("users", &filters).await?;
//! # Ok(())
//! # }
//! ```

pub mod pocketbase;
