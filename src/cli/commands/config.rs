//! Config command implementation.

use crate::cli::ConfigAction;
use crate::config::Settings;
use anyhow::Result;
use std::path::Path;

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: &Settings, path: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", settings.to_toml()?);
        }

        ConfigAction::Path => {
            let config_path = match path {
                Some(p) => p.to_path_buf(),
                None => Settings::default_config_path(),
            };
            println!("{}", config_path.display());
        }
    }

    Ok(())
}
