//! CLI module.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// SEPTA Transit MCP
///
/// Real-time SEPTA bus locations, detours and alerts for AI assistants,
/// served over the Model Context Protocol.
#[derive(Parser, Debug)]
#[command(name = "septa-mcp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SEPTA_MCP_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (GET / for info, POST / for JSON-RPC)
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Start the MCP server on stdio for AI assistant integration
    Mcp,

    /// Invoke a tool once and print the result
    Call {
        /// Tool name (get_bus_locations, get_bus_detours, get_transit_alerts)
        tool: String,

        /// Route number, required for locations and detours
        #[arg(short, long)]
        route: Option<String>,
    },

    /// Show the endpoint fallback chain for each tool
    Endpoints,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_call_with_route() {
        let cli = Cli::parse_from(["septa-mcp", "-v", "call", "get_bus_locations", "--route", "23"]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Call { tool, route } => {
                assert_eq!(tool, "get_bus_locations");
                assert_eq!(route.as_deref(), Some("23"));
            }
            _ => panic!("Expected Call command"),
        }
    }

    #[test]
    fn test_parse_serve_defaults_to_settings() {
        let cli = Cli::parse_from(["septa-mcp", "serve"]);
        match cli.command {
            Commands::Serve { host, port } => {
                assert!(host.is_none());
                assert!(port.is_none());
            }
            _ => panic!("Expected Serve command"),
        }
    }
}
