//! Endpoints command - show the fallback chain for every tool.

use crate::cli::Output;
use crate::config::Settings;
use crate::resolver::{EndpointCatalog, RequestKind, ResponseShape};
use anyhow::Result;
use console::style;

/// Print each tool's candidate endpoints in the order they are tried.
pub fn run_endpoints(settings: &Settings) -> Result<()> {
    let catalog = EndpointCatalog::from_settings(&settings.upstream)?;

    Output::header("Endpoint fallback chains");

    for kind in RequestKind::ALL {
        println!();
        println!(
            "{} ({})",
            style(kind.tool_name()).bold(),
            kind.description()
        );

        let templates = catalog.templates(kind);
        for (i, (candidate, template)) in catalog.candidates(kind).iter().zip(templates).enumerate() {
            let shape = match candidate.shape {
                ResponseShape::PerRoute => "per-route",
                ResponseShape::Aggregate => "aggregate, filtered by route",
            };
            println!(
                "  {}. {} {}",
                i + 1,
                style(candidate.label).cyan(),
                style(format!("[{}]", shape)).dim()
            );
            println!("     {}", template);
        }
    }

    Ok(())
}
