//! HTTP transport for the MCP server.
//!
//! `GET /` describes the server, `POST /` takes one JSON-RPC message.

use crate::cli::Output;
use crate::config::Settings;
use crate::mcp::protocol::{JsonRpcResponse, INTERNAL_ERROR};
use crate::mcp::{get_tools, parse_request, McpServer, SERVER_NAME, SERVER_VERSION};
use crate::resolver::RequestKind;
use crate::service::TransitService;
use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Shared application state.
struct AppState {
    server: McpServer,
    request_timeout: Duration,
}

/// Run the HTTP server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let service = Arc::new(TransitService::from_settings(&settings)?);
    let app = build_router(
        McpServer::new(service),
        Duration::from_secs(settings.server.request_timeout_secs),
    );

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("SEPTA Transit MCP");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Info", "GET  /");
    Output::kv("MCP", "POST /");
    Output::kv("Health", "GET  /health");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    info!(%addr, "HTTP server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Build the router. Exposed for tests and embedding.
pub fn build_router(server: McpServer, request_timeout: Duration) -> Router {
    let state = Arc::new(AppState {
        server,
        request_timeout,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(
            "/",
            get(server_info)
                .post(rpc)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn server_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let catalog = state.server.service().catalog();
    let tools: Vec<String> = get_tools().into_iter().map(|t| t.name).collect();

    Json(json!({
        "name": SERVER_NAME,
        "version": SERVER_VERSION,
        "status": "active",
        "protocol": "MCP JSON-RPC 2.0",
        "tools": tools,
        "endpoints": {
            "info": "GET /",
            "health": "GET /health",
            "mcp": "POST /"
        },
        "apiEndpoints": {
            "transitView": catalog.templates(RequestKind::Locations),
            "busDetours": catalog.templates(RequestKind::Detours),
            "alerts": catalog.templates(RequestKind::Alerts)
        },
        "note": "Endpoints are tried in order; the first usable response wins"
    }))
}

async fn rpc(State(state): State<Arc<AppState>>, body: String) -> Response {
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(response) => return Json(response).into_response(),
    };

    let id = request.id.clone();
    match tokio::time::timeout(state.request_timeout, state.server.handle_request(request)).await {
        Ok(Some(response)) => Json(response).into_response(),
        Ok(None) => StatusCode::ACCEPTED.into_response(),
        Err(_) => {
            warn!(
                timeout_secs = state.request_timeout.as_secs_f64(),
                "JSON-RPC call timed out"
            );
            Json(JsonRpcResponse::error(
                id,
                INTERNAL_ERROR,
                &format!(
                    "Request timed out after {:.1}s",
                    state.request_timeout.as_secs_f64()
                ),
            ))
            .into_response()
        }
    }
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({
            "error": "Method not allowed",
            "allowed": ["GET", "POST", "OPTIONS"]
        })),
    )
}
