//! Configuration module.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{GeneralSettings, ServerSettings, Settings, UpstreamSettings};
