//! Call command - invoke one tool from the command line.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::SeptaError;
use crate::service::TransitService;
use anyhow::Result;
use serde_json::json;

/// Invoke a tool and print the resulting document to stdout.
pub async fn run_call(tool: &str, route: Option<&str>, settings: &Settings) -> Result<()> {
    let service = TransitService::from_settings(settings)?;
    let args = match route {
        Some(route) => json!({ "route": route }),
        None => json!({}),
    };

    let spinner = Output::spinner(&format!("Calling {}...", tool));
    let result = service.invoke(tool, &args).await;
    spinner.finish_and_clear();

    match result {
        Ok(document) => {
            println!("{}", serde_json::to_string_pretty(&document)?);
            Ok(())
        }
        Err(SeptaError::AllEndpointsFailed { kind, failures }) => {
            Output::error(&format!("All endpoints failed for {}", kind.description()));
            for failure in &failures {
                Output::list_item(&failure.to_string());
            }
            anyhow::bail!("{} endpoints tried, none usable", failures.len())
        }
        Err(e) => Err(e.into()),
    }
}
