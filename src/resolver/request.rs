//! Logical request kinds and descriptors.

use crate::error::{Result, SeptaError};
use serde::Serialize;

/// The three data families the server can look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    /// Real-time vehicle positions for one route.
    Locations,
    /// Active detours for one route.
    Detours,
    /// System-wide alerts and advisories.
    Alerts,
}

impl RequestKind {
    pub const ALL: [RequestKind; 3] = [
        RequestKind::Locations,
        RequestKind::Detours,
        RequestKind::Alerts,
    ];

    /// Whether requests of this kind must name a route.
    pub fn requires_route(self) -> bool {
        matches!(self, RequestKind::Locations | RequestKind::Detours)
    }

    /// Name of the MCP tool serving this kind.
    pub fn tool_name(self) -> &'static str {
        match self {
            RequestKind::Locations => "get_bus_locations",
            RequestKind::Detours => "get_bus_detours",
            RequestKind::Alerts => "get_transit_alerts",
        }
    }

    /// Look up the kind served by a tool.
    pub fn from_tool_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tool_name() == name)
    }

    /// Human-readable name used in error messages.
    pub fn description(self) -> &'static str {
        match self {
            RequestKind::Locations => "bus locations",
            RequestKind::Detours => "bus detours",
            RequestKind::Alerts => "transit alerts",
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestKind::Locations => write!(f, "locations"),
            RequestKind::Detours => write!(f, "detours"),
            RequestKind::Alerts => write!(f, "alerts"),
        }
    }
}

/// A single logical lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    kind: RequestKind,
    route: Option<String>,
}

impl RequestDescriptor {
    /// Build a descriptor. The route is dropped for kinds that ignore it.
    pub fn new(kind: RequestKind, route: Option<String>) -> Self {
        let route = if kind.requires_route() { route } else { None };
        Self { kind, route }
    }

    pub fn locations(route: impl Into<String>) -> Self {
        Self::new(RequestKind::Locations, Some(route.into()))
    }

    pub fn detours(route: impl Into<String>) -> Self {
        Self::new(RequestKind::Detours, Some(route.into()))
    }

    pub fn alerts() -> Self {
        Self::new(RequestKind::Alerts, None)
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// Check the route requirement and return the trimmed route, if any.
    pub fn validated_route(&self) -> Result<Option<&str>> {
        if !self.kind.requires_route() {
            return Ok(None);
        }

        match self.route.as_deref().map(str::trim) {
            Some(route) if !route.is_empty() => Ok(Some(route)),
            _ => Err(SeptaError::Validation(
                "route parameter is required".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_name_round_trip() {
        for kind in RequestKind::ALL {
            assert_eq!(RequestKind::from_tool_name(kind.tool_name()), Some(kind));
        }
        assert_eq!(RequestKind::from_tool_name("get_train_view"), None);
    }

    #[test]
    fn test_route_required_for_locations_and_detours() {
        assert!(RequestDescriptor::new(RequestKind::Locations, None)
            .validated_route()
            .is_err());
        assert!(RequestDescriptor::detours("   ").validated_route().is_err());
        assert_eq!(
            RequestDescriptor::locations(" 23 ").validated_route().unwrap(),
            Some("23")
        );
    }

    #[test]
    fn test_alerts_ignore_route() {
        let with_route = RequestDescriptor::new(RequestKind::Alerts, Some("23".to_string()));
        assert_eq!(with_route, RequestDescriptor::alerts());
        assert_eq!(with_route.validated_route().unwrap(), None);
    }
}
