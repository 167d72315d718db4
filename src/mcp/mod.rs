//! MCP (Model Context Protocol) glue.
//!
//! JSON-RPC 2.0 dispatch shared by the stdio transport and the HTTP server.

pub mod protocol;
mod server;
mod tools;

pub use server::{error_response, parse_request, McpServer, PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION};
pub use tools::{get_tools, tool_for};
