//! CLI command implementations.

mod call;
mod config;
mod endpoints;
mod mcp;
mod serve;

pub use call::run_call;
pub use config::run_config;
pub use endpoints::run_endpoints;
pub use mcp::run_mcp;
pub use serve::{build_router, run_serve};
