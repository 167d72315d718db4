//! Ordered upstream endpoint candidates per request kind.

use super::RequestKind;
use crate::config::UpstreamSettings;
use crate::error::{Result, SeptaError};
use serde::Serialize;
use url::Url;

/// Which base URL a candidate is fetched through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Secure,
    Plain,
}

/// How a candidate's response relates to the requested route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// Already scoped to the requested route.
    PerRoute,
    /// Describes every route; must be filtered before use.
    Aggregate,
}

/// One upstream endpoint to try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EndpointCandidate {
    pub label: &'static str,
    pub transport: Transport,
    /// Path and query relative to the base URL. `{route}` is substituted.
    pub path: &'static str,
    pub shape: ResponseShape,
}

const fn candidate(
    label: &'static str,
    transport: Transport,
    path: &'static str,
    shape: ResponseShape,
) -> EndpointCandidate {
    EndpointCandidate {
        label,
        transport,
        path,
        shape,
    }
}

// Most trusted first.
const LOCATION_CANDIDATES: &[EndpointCandidate] = &[
    candidate(
        "transitview-secure",
        Transport::Secure,
        "/api/TransitView/index.php?route={route}",
        ResponseShape::PerRoute,
    ),
    candidate(
        "transitview-plain",
        Transport::Plain,
        "/api/TransitView/index.php?route={route}",
        ResponseShape::PerRoute,
    ),
    candidate(
        "transitview-legacy",
        Transport::Secure,
        "/TransitView/index.php?route={route}",
        ResponseShape::PerRoute,
    ),
    candidate(
        "transitview-all",
        Transport::Secure,
        "/api/TransitViewAll/index.php",
        ResponseShape::Aggregate,
    ),
];

const DETOUR_CANDIDATES: &[EndpointCandidate] = &[
    candidate(
        "busdetours-secure",
        Transport::Secure,
        "/api/BusDetours/index.php?route={route}",
        ResponseShape::PerRoute,
    ),
    candidate(
        "busdetours-plain",
        Transport::Plain,
        "/api/BusDetours/index.php?route={route}",
        ResponseShape::PerRoute,
    ),
];

const ALERT_CANDIDATES: &[EndpointCandidate] = &[
    candidate(
        "alerts-secure",
        Transport::Secure,
        "/api/Alerts/index.php",
        ResponseShape::PerRoute,
    ),
    candidate(
        "alerts-plain",
        Transport::Plain,
        "/api/Alerts/index.php",
        ResponseShape::PerRoute,
    ),
];

/// Immutable candidate chains plus the base URLs they resolve against.
#[derive(Debug, Clone)]
pub struct EndpointCatalog {
    secure_base: String,
    plain_base: String,
}

impl EndpointCatalog {
    /// Create a catalog from explicit base URLs.
    pub fn new(secure_base: &str, plain_base: &str) -> Result<Self> {
        Ok(Self {
            secure_base: parse_base(secure_base)?,
            plain_base: parse_base(plain_base)?,
        })
    }

    /// Create a catalog from upstream settings.
    pub fn from_settings(settings: &UpstreamSettings) -> Result<Self> {
        Self::new(&settings.secure_base_url, &settings.plain_base_url)
    }

    /// Candidates for a request kind, in priority order.
    pub fn candidates(&self, kind: RequestKind) -> &'static [EndpointCandidate] {
        match kind {
            RequestKind::Locations => LOCATION_CANDIDATES,
            RequestKind::Detours => DETOUR_CANDIDATES,
            RequestKind::Alerts => ALERT_CANDIDATES,
        }
    }

    /// Concrete URL for a candidate, with the route percent-encoded.
    pub fn url_for(&self, candidate: &EndpointCandidate, route: Option<&str>) -> String {
        let base = match candidate.transport {
            Transport::Secure => &self.secure_base,
            Transport::Plain => &self.plain_base,
        };
        let encoded: String = url::form_urlencoded::byte_serialize(route.unwrap_or("").as_bytes())
            .collect();

        format!("{}{}", base, candidate.path.replace("{route}", &encoded))
    }

    /// URL templates for display, with the `{route}` placeholder kept.
    pub fn templates(&self, kind: RequestKind) -> Vec<String> {
        self.candidates(kind)
            .iter()
            .map(|c| {
                let base = match c.transport {
                    Transport::Secure => &self.secure_base,
                    Transport::Plain => &self.plain_base,
                };
                format!("{}{}", base, c.path)
            })
            .collect()
    }
}

/// Validate a base URL and strip any trailing slash.
fn parse_base(base: &str) -> Result<String> {
    let parsed = Url::parse(base)
        .map_err(|e| SeptaError::Config(format!("Invalid upstream base URL '{}': {}", base, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(base.trim_end_matches('/').to_string()),
        other => Err(SeptaError::Config(format!(
            "Upstream base URL '{}' must use http or https, not {}",
            base, other
        ))),
    }
}
