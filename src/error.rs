//! Error types for the SEPTA MCP server.

use crate::resolver::{CandidateFailure, RequestKind};
use serde::Serialize;
use thiserror::Error;

/// Number of body characters kept in diagnostics.
pub const BODY_PREVIEW_CHARS: usize = 200;

/// Classified failure of a single upstream GET.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FetchError {
    /// Connection, DNS, TLS, timeout or body read failure.
    #[error("Request failed: {message}")]
    Transport { message: String },

    /// The upstream answered with something other than 200.
    #[error("HTTP {status}: {}", preview(.body))]
    HttpStatus { status: u16, body: String },

    /// The body was not valid JSON.
    #[error("Failed to parse JSON: {message}. Response: {preview}")]
    Decode { message: String, preview: String },
}

impl FetchError {
    /// Short machine-readable name of the failure class.
    pub fn class(&self) -> &'static str {
        match self {
            FetchError::Transport { .. } => "transport",
            FetchError::HttpStatus { .. } => "http_status",
            FetchError::Decode { .. } => "decode",
        }
    }
}

/// Library-level error type.
#[derive(Error, Debug)]
pub enum SeptaError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Bad caller input. Never retried.
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Every candidate endpoint was tried and none produced a usable document.
    #[error("{}", describe_exhausted(.kind, .failures))]
    AllEndpointsFailed {
        kind: RequestKind,
        failures: Vec<CandidateFailure>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, SeptaError>;

/// First `BODY_PREVIEW_CHARS` characters of a body, on a char boundary.
pub fn preview(body: &str) -> String {
    match body.char_indices().nth(BODY_PREVIEW_CHARS) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}

fn describe_exhausted(kind: &RequestKind, failures: &[CandidateFailure]) -> String {
    let details: Vec<String> = failures.iter().map(ToString::to_string).collect();
    format!(
        "All {} endpoints failed for {}: {}",
        failures.len(),
        kind.description(),
        details.join("; ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_long_bodies() {
        let body = "x".repeat(500);
        let short = preview(&body);
        assert_eq!(short.len(), BODY_PREVIEW_CHARS + 3);
        assert!(short.ends_with("..."));

        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let body = "é".repeat(300);
        let short = preview(&body);
        assert_eq!(short.chars().count(), BODY_PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_fetch_error_serializes_with_class_tag() {
        let err = FetchError::HttpStatus {
            status: 503,
            body: "down".to_string(),
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "http_status");
        assert_eq!(json["status"], 503);
        assert_eq!(err.class(), "http_status");
        assert_eq!(err.to_string(), "HTTP 503: down");
    }
}
