//! MCP request dispatch and the stdio transport.

use super::protocol::*;
use super::tools::get_tools;
use crate::error::SeptaError;
use crate::service::TransitService;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "SEPTA Transit MCP";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Transport-independent MCP request handler.
#[derive(Clone)]
pub struct McpServer {
    service: Arc<TransitService>,
}

impl McpServer {
    /// Create a new MCP server.
    pub fn new(service: Arc<TransitService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &TransitService {
        &self.service
    }

    /// Run over stdio: one JSON-RPC message per line in, one response per
    /// line out. Logs go to stderr.
    pub async fn run(&self) -> anyhow::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        info!("SEPTA MCP server starting on stdio");

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(response) = self.handle_message(line).await {
                let mut text = serde_json::to_string(&response)?;
                text.push('\n');
                stdout.write_all(text.as_bytes()).await?;
                stdout.flush().await?;
            }
        }

        info!("stdin closed, shutting down");
        Ok(())
    }

    /// Parse and handle one raw message.
    pub async fn handle_message(&self, text: &str) -> Option<JsonRpcResponse> {
        match parse_request(text) {
            Ok(request) => self.handle_request(request).await,
            Err(response) => Some(response),
        }
    }

    /// Handle a single JSON-RPC request. Returns `None` for notifications.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id,
                INVALID_REQUEST,
                "Invalid Request: jsonrpc must be \"2.0\"",
            ));
        }

        if request.is_notification() {
            debug!("Received notification {}", request.method);
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            ),
        };

        Some(response)
    }

    /// Handle initialize request.
    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        success(id, &result)
    }

    /// Handle tools/list request.
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        success(id, &ToolsListResult { tools: get_tools() })
    }

    /// Handle tools/call request.
    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        INVALID_PARAMS,
                        &format!("Invalid params: {}", e),
                    )
                }
            },
            None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
        };

        let args = params.arguments.unwrap_or_else(|| json!({}));

        match self.service.invoke(&params.name, &args).await {
            Ok(document) => match serde_json::to_string_pretty(&document) {
                Ok(text) => success(id, &ToolCallResult::text(text)),
                Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, &e.to_string()),
            },
            Err(e) => error_response(id, &e),
        }
    }
}

/// Parse raw text into a request, or the error response to send instead.
pub fn parse_request(text: &str) -> std::result::Result<JsonRpcRequest, JsonRpcResponse> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        warn!("Failed to parse request: {}", e);
        JsonRpcResponse::error(None, PARSE_ERROR, "Parse error")
    })?;

    let id = value.get("id").cloned();
    serde_json::from_value(value).map_err(|e| {
        JsonRpcResponse::error(id, INVALID_REQUEST, &format!("Invalid Request: {}", e))
    })
}

/// Map a library error onto a JSON-RPC error.
pub fn error_response(id: Option<Value>, err: &SeptaError) -> JsonRpcResponse {
    match err {
        SeptaError::Validation(_) | SeptaError::UnknownTool(_) => {
            JsonRpcResponse::error(id, INVALID_PARAMS, &err.to_string())
        }
        SeptaError::AllEndpointsFailed { kind, failures } => {
            error!("Tool call failed: {}", err);
            JsonRpcResponse::error_with_data(
                id,
                INTERNAL_ERROR,
                &err.to_string(),
                Some(json!({ "kind": kind, "failures": failures })),
            )
        }
        _ => {
            error!("Tool call failed: {}", err);
            JsonRpcResponse::error(id, INTERNAL_ERROR, &err.to_string())
        }
    }
}

fn success<T: Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, &e.to_string()),
    }
}
