//! SEPTA MCP entry point.

use anyhow::Result;
use clap::Parser;
use septa_mcp::cli::{commands, Cli, Commands};
use septa_mcp::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.as_deref().map(Settings::expand_path);
    let settings = Settings::load_from(config_path.as_deref())?;

    // Initialize logging. stdout carries JSON-RPC in `mcp` mode, so logs go to stderr.
    let log_level = match cli.verbose {
        0 => settings.general.log_level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("septa_mcp={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Execute command
    match &cli.command {
        Commands::Serve { host, port } => {
            let host = host.clone().unwrap_or_else(|| settings.server.host.clone());
            let port = port.unwrap_or(settings.server.port);
            commands::run_serve(&host, port, settings).await?;
        }

        Commands::Mcp => {
            commands::run_mcp(settings).await?;
        }

        Commands::Call { tool, route } => {
            commands::run_call(tool, route.as_deref(), &settings).await?;
        }

        Commands::Endpoints => {
            commands::run_endpoints(&settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, &settings, config_path.as_deref())?;
        }
    }

    Ok(())
}
