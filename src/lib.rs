//! SEPTA Transit MCP
//!
//! Real-time SEPTA bus locations, detours and service alerts exposed as
//! Model Context Protocol tools.
//!
//! # Architecture
//!
//! - `fetch` - single-GET transport with JSON decoding and failure classification
//! - `resolver` - ordered endpoint fallback and aggregate-response filtering
//! - `service` - tool invocation entry point
//! - `mcp` - JSON-RPC dispatch and the stdio transport
//! - `events` - structured fetch events and observers
//! - `config` - configuration management
//! - `cli` - command-line interface and the HTTP transport
//!
//! # Example
//!
//! ```rust,no_run
//! use septa_mcp::config::Settings;
//! use septa_mcp::service::TransitService;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let service = TransitService::from_settings(&settings)?;
//!
//!     let buses = service
//!         .invoke("get_bus_locations", &json!({ "route": "23" }))
//!         .await?;
//!     println!("{}", serde_json::to_string_pretty(&buses)?);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod fetch;
pub mod mcp;
pub mod resolver;
pub mod service;

pub use error::{FetchError, Result, SeptaError};
