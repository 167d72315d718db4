//! Tool invocation entry point.
//!
//! Maps MCP tool names and arguments to resolver requests.

use crate::config::Settings;
use crate::error::{Result, SeptaError};
use crate::events::{FetchObserver, TracingObserver};
use crate::fetch::HttpFetcher;
use crate::resolver::{EndpointCatalog, RequestDescriptor, RequestKind, Resolver};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

/// Serves tool calls by resolving them against the upstream provider.
pub struct TransitService {
    resolver: Resolver,
}

impl TransitService {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    /// Build the production stack: reqwest fetcher, configured catalog,
    /// events forwarded to `tracing`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let observer: Arc<dyn FetchObserver> = Arc::new(TracingObserver);
        let fetcher = HttpFetcher::new(&settings.upstream, observer.clone())?;
        let catalog = EndpointCatalog::from_settings(&settings.upstream)?;

        Ok(Self::new(Resolver::new(Arc::new(fetcher), catalog, observer)))
    }

    pub fn catalog(&self) -> &EndpointCatalog {
        self.resolver.catalog()
    }

    /// Invoke a tool by name.
    ///
    /// Unknown tools and missing routes fail without touching the network.
    #[instrument(skip(self, args))]
    pub async fn invoke(&self, tool_name: &str, args: &Value) -> Result<Value> {
        let kind = RequestKind::from_tool_name(tool_name)
            .ok_or_else(|| SeptaError::UnknownTool(tool_name.to_string()))?;

        let route = if kind.requires_route() {
            Some(route_argument(args)?)
        } else {
            None
        };

        match &route {
            Some(route) => info!("Getting {} for route {}", kind.description(), route),
            None => info!("Getting {}", kind.description()),
        }

        self.resolver
            .resolve(&RequestDescriptor::new(kind, route))
            .await
    }
}

/// Extract `args.route`. Numbers are accepted and rendered as text.
fn route_argument(args: &Value) -> Result<String> {
    match args.get("route") {
        Some(Value::String(route)) if !route.trim().is_empty() => Ok(route.trim().to_string()),
        Some(Value::Number(route)) => Ok(route.to_string()),
        _ => Err(SeptaError::Validation(
            "route parameter is required and must be a string".to_string(),
        )),
    }
}
