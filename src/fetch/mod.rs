//! Single-GET transport with JSON decoding and uniform failure classification.
//!
//! A fetcher performs exactly one attempt per call. Retrying and falling back
//! to other endpoints is the resolver's job.

mod http;

pub use http::HttpFetcher;

use crate::error::FetchError;
use async_trait::async_trait;
use serde_json::Value;

/// Trait for upstream fetchers.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET `url` and decode the body as JSON.
    ///
    /// Succeeds only for a 200 response whose body parses as JSON.
    async fn fetch(&self, url: &str) -> std::result::Result<Value, FetchError>;
}
