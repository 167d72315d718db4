//! MCP tool definitions.

use super::protocol::Tool;
use crate::resolver::RequestKind;
use serde_json::json;

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    RequestKind::ALL.into_iter().map(tool_for).collect()
}

/// Descriptor for the tool serving a request kind.
pub fn tool_for(kind: RequestKind) -> Tool {
    match kind {
        RequestKind::Locations => Tool {
            name: kind.tool_name().to_string(),
            description: "Get real-time locations for all vehicles on a specific SEPTA route \
                using the TransitView API. Returns vehicle positions, directions, labels, and destinations."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "route": {
                        "type": "string",
                        "description": "The route number (e.g., \"23\", \"33\", \"45\", \"G\"). Use official SEPTA route numbers."
                    }
                },
                "required": ["route"]
            }),
        },
        RequestKind::Detours => Tool {
            name: kind.tool_name().to_string(),
            description: "Check for active detours on a specific SEPTA route using the Bus Detours API."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "route": {
                        "type": "string",
                        "description": "The route number to check for detours (e.g., \"23\", \"45\")"
                    }
                },
                "required": ["route"]
            }),
        },
        RequestKind::Alerts => Tool {
            name: kind.tool_name().to_string(),
            description: "Get general system alerts and advisories for SEPTA services using the Alerts API."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_tool_per_kind() {
        let names: Vec<String> = get_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec!["get_bus_locations", "get_bus_detours", "get_transit_alerts"]
        );
    }

    #[test]
    fn test_route_required_only_where_needed() {
        for tool in get_tools() {
            let required = tool.input_schema.get("required");
            if tool.name == "get_transit_alerts" {
                assert!(required.is_none());
            } else {
                assert_eq!(required, Some(&json!(["route"])));
            }
        }
    }
}
