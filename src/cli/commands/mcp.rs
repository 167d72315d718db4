//! MCP command implementation.

use crate::config::Settings;
use crate::mcp::McpServer;
use crate::service::TransitService;
use anyhow::Result;
use std::sync::Arc;

/// Run the MCP server over stdio.
pub async fn run_mcp(settings: Settings) -> Result<()> {
    let service = TransitService::from_settings(&settings)?;
    let server = McpServer::new(Arc::new(service));
    server.run().await
}
