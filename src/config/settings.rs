//! Configuration settings for the SEPTA MCP server.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub upstream: UpstreamSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level when no `-v` flag is given (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// HTTP server settings for `serve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Upper bound on a single JSON-RPC call, fallback chain included.
    pub request_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_secs: 30,
        }
    }
}

/// Upstream provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
    /// Base URL for secure candidates.
    pub secure_base_url: String,
    /// Base URL for plain-HTTP candidates.
    pub plain_base_url: String,
    /// Timeout for one candidate attempt, body included.
    pub timeout_secs: u64,
    /// TCP + TLS connect timeout.
    pub connect_timeout_secs: u64,
    /// User-Agent header sent upstream.
    pub user_agent: String,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            secure_base_url: "https://www3.septa.org".to_string(),
            plain_base_url: "http://www3.septa.org".to_string(),
            timeout_secs: 10,
            connect_timeout_secs: 5,
            user_agent: format!("septa-mcp/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// A missing file yields the defaults.
    pub fn load_from(path: Option<&Path>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            settings.validate()?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Reject values that would make the fetch layer unbounded.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.upstream.timeout_secs == 0 {
            return Err(crate::error::SeptaError::Config(
                "upstream.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.upstream.connect_timeout_secs == 0 {
            return Err(crate::error::SeptaError::Config(
                "upstream.connect_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(crate::error::SeptaError::Config(
                "server.request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Serialize the effective settings as TOML.
    pub fn to_toml(&self) -> crate::error::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::error::SeptaError::Config(e.to_string()))
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("septa-mcp")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(Some(dir.path().join("absent.toml").as_path())).unwrap();

        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.upstream.timeout_secs, 10);
        assert_eq!(settings.upstream.secure_base_url, "https://www3.septa.org");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[upstream]\ntimeout_secs = 4\nplain_base_url = \"http://localhost:9000\"\n\n[server]\nport = 8080"
        )
        .unwrap();

        let settings = Settings::load_from(Some(file.path())).unwrap();
        assert_eq!(settings.upstream.timeout_secs, 4);
        assert_eq!(settings.upstream.plain_base_url, "http://localhost:9000");
        assert_eq!(settings.upstream.connect_timeout_secs, 5);
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "127.0.0.1");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[upstream]\ntimeout_secs = 0").unwrap();

        assert!(Settings::load_from(Some(file.path())).is_err());
    }

    #[test]
    fn test_settings_round_trip_through_toml() {
        let text = Settings::default().to_toml().unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed.server.request_timeout_secs, 30);
    }
}
