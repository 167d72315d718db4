//! Filtering of "all routes" responses down to a single route.
//!
//! The recognized shapes are heuristics; the provider does not document the
//! aggregate schema. Recognized:
//!
//! - `{"routes": {"23": <payload>, ...}}` yields `<payload>`
//! - `{"routes": [{"23": <payload>}, {"45": ...}]}` yields `<payload>`
//! - `[{"route": "23", ...}, ...]` (or the same under `routes`) yields
//!   `{"results": [<matching records>]}`
//! - `{"23": <payload>, ...}` yields `<payload>`
//!
//! Anything else is unusable. Unfiltered aggregate data is never returned.

use serde_json::{json, Map, Value};

/// Record fields that may carry a route identifier.
const ROUTE_FIELDS: [&str; 2] = ["route", "route_id"];

/// Reduce an aggregate document to the part describing `route`.
///
/// Returns a description of why the document is unusable otherwise.
pub fn filter_aggregate(document: Value, route: &str) -> Result<Value, String> {
    match document {
        Value::Object(mut map) => match map.remove("routes") {
            Some(Value::Object(routes)) => lookup(routes, route),
            Some(Value::Array(entries)) => from_sequence(entries, route),
            Some(other) => Err(format!(
                "aggregate `routes` field is {}, expected an object or array",
                type_name(&other)
            )),
            None => map.remove(route).ok_or_else(|| {
                format!(
                    "aggregate object has no `routes` field and no entry for route {}",
                    route
                )
            }),
        },
        Value::Array(entries) => from_sequence(entries, route),
        other => Err(format!(
            "aggregate response is {}, expected an object or array",
            type_name(&other)
        )),
    }
}

fn lookup(mut routes: Map<String, Value>, route: &str) -> Result<Value, String> {
    routes
        .remove(route)
        .ok_or_else(|| format!("route {} is not present in the aggregate response", route))
}

fn from_sequence(entries: Vec<Value>, route: &str) -> Result<Value, String> {
    if entries.iter().any(|e| record_route(e).is_some()) {
        let results: Vec<Value> = entries
            .into_iter()
            .filter(|e| record_route(e).as_deref() == Some(route))
            .collect();
        return Ok(json!({ "results": results }));
    }

    // Provider's live shape: a list of single-route maps.
    if !entries.is_empty() && entries.iter().all(Value::is_object) {
        for entry in entries {
            if let Value::Object(mut map) = entry {
                if let Some(payload) = map.remove(route) {
                    return Ok(payload);
                }
            }
        }
        return Err(format!(
            "route {} is not present in the aggregate response",
            route
        ));
    }

    Err("aggregate sequence entries carry no route identifier".to_string())
}

/// Route identifier of a flat record, if it has one.
fn record_route(entry: &Value) -> Option<String> {
    let fields = entry.as_object()?;
    ROUTE_FIELDS
        .iter()
        .find_map(|field| match fields.get(*field)? {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_map_extracts_entry() {
        let document = json!({
            "routes": {
                "23": {"bus": [{"VehicleID": "8001"}]},
                "45": {"bus": []}
            }
        });

        let filtered = filter_aggregate(document, "23").unwrap();
        assert_eq!(filtered, json!({"bus": [{"VehicleID": "8001"}]}));
    }

    #[test]
    fn test_flat_array_filters_and_wraps() {
        let document = json!([
            {"route": "23", "lat": 39.95},
            {"route": "45", "lat": 39.91},
            {"route": "23", "lat": 39.96}
        ]);

        let filtered = filter_aggregate(document, "23").unwrap();
        assert_eq!(
            filtered,
            json!({"results": [
                {"route": "23", "lat": 39.95},
                {"route": "23", "lat": 39.96}
            ]})
        );
    }

    #[test]
    fn test_flat_array_without_match_yields_empty_results() {
        let document = json!([{"route": "45"}]);
        assert_eq!(
            filter_aggregate(document, "23").unwrap(),
            json!({"results": []})
        );
    }

    #[test]
    fn test_numeric_route_ids_match() {
        let document = json!({"routes": [{"route_id": 23, "n": 1}, {"route_id": 45, "n": 2}]});
        assert_eq!(
            filter_aggregate(document, "23").unwrap(),
            json!({"results": [{"route_id": 23, "n": 1}]})
        );
    }

    #[test]
    fn test_list_of_route_maps() {
        let document = json!({"routes": [{"17": [{"label": "1"}]}, {"23": [{"label": "2"}]}]});
        assert_eq!(
            filter_aggregate(document, "23").unwrap(),
            json!([{"label": "2"}])
        );
    }

    #[test]
    fn test_bare_route_map() {
        let document = json!({"23": [1, 2], "45": [3]});
        assert_eq!(filter_aggregate(document, "23").unwrap(), json!([1, 2]));
    }

    #[test]
    fn test_missing_route_in_map_is_unusable() {
        let document = json!({"routes": {"45": {"bus": []}}});
        let reason = filter_aggregate(document, "23").unwrap_err();
        assert!(reason.contains("not present"));
    }

    #[test]
    fn test_unrecognized_shapes_are_unusable() {
        assert!(filter_aggregate(json!("ok"), "23").is_err());
        assert!(filter_aggregate(json!({"bus": []}), "23").is_err());
        assert!(filter_aggregate(json!([1, 2, 3]), "23").is_err());
        assert!(filter_aggregate(json!([]), "23").is_err());
        assert!(filter_aggregate(json!({"routes": 5}), "23").is_err());
    }
}
