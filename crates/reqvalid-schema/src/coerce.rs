//! In-place type coercion for query parameters.
//!
//! Query strings carry every value as a string. Before validation, values are
//! rewritten toward the types their schema declares, following the schema
//! through `properties`, `additionalProperties`, `prefixItems` and `items`,
//! into local `$ref` targets and into `allOf`/`anyOf`/`oneOf` members.
//! Values that cannot be coerced are left as-is for the `type` keyword to report.

use serde_json::{Map, Number, Value};

use crate::walk::{in_place_subschemas, ALL_APPLICATORS, MAX_DEPTH};

/// Coerce `value` in place toward the types declared by `schema`.
///
/// `schema` is treated as the document root for `$ref` resolution.
pub fn coerce_types(schema: &Value, value: &mut Value) {
    coerce_node(schema, schema, value, 0);
}

fn coerce_node(root: &Value, schema: &Value, value: &mut Value, depth: usize) {
    if depth > MAX_DEPTH {
        return;
    }
    let Value::Object(schema) = schema else {
        return;
    };

    coerce_scalar(schema, value);

    match value {
        Value::Object(object) => coerce_object(root, schema, object, depth),
        Value::Array(items) => coerce_items(root, schema, items, depth),
        _ => {}
    }

    for subschema in in_place_subschemas(root, schema, ALL_APPLICATORS) {
        coerce_node(root, subschema, value, depth + 1);
    }
}

fn coerce_object(
    root: &Value,
    schema: &Map<String, Value>,
    object: &mut Map<String, Value>,
    depth: usize,
) {
    let properties = schema.get("properties").and_then(Value::as_object);
    let additional = schema
        .get("additionalProperties")
        .filter(|value| value.is_object());

    for (key, child) in object.iter_mut() {
        match properties.and_then(|properties| properties.get(key)) {
            Some(child_schema) => coerce_node(root, child_schema, child, depth + 1),
            None => {
                if let Some(additional) = additional {
                    coerce_node(root, additional, child, depth + 1);
                }
            }
        }
    }
}

fn coerce_items(root: &Value, schema: &Map<String, Value>, items: &mut [Value], depth: usize) {
    let prefix = match schema.get("prefixItems") {
        Some(Value::Array(prefix)) => prefix.as_slice(),
        _ => &[],
    };
    for (item_schema, item) in prefix.iter().zip(items.iter_mut()) {
        coerce_node(root, item_schema, item, depth + 1);
    }

    match schema.get("items") {
        // Tuple form used by drafts before 2020-12.
        Some(Value::Array(tuple)) => {
            for (item_schema, item) in tuple.iter().zip(items.iter_mut()) {
                coerce_node(root, item_schema, item, depth + 1);
            }
        }
        Some(item_schema @ Value::Object(_)) => {
            for item in items.iter_mut().skip(prefix.len()) {
                coerce_node(root, item_schema, item, depth + 1);
            }
        }
        _ => {}
    }
}

fn declared_types(schema: &Map<String, Value>) -> Vec<&str> {
    match schema.get("type") {
        Some(Value::String(kind)) => vec![kind.as_str()],
        Some(Value::Array(kinds)) => kinds.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

fn matches_type(kind: &str, value: &Value) -> bool {
    match kind {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => is_integer(value),
        "boolean" => value.is_boolean(),
        "null" => value.is_null(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        _ => false,
    }
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0),
        _ => false,
    }
}

fn coerce_scalar(schema: &Map<String, Value>, value: &mut Value) {
    let kinds = declared_types(schema);
    if kinds.is_empty() || kinds.iter().any(|kind| matches_type(kind, value)) {
        return;
    }

    for kind in kinds {
        if let Some(coerced) = coerce_to(kind, value) {
            *value = coerced;
            return;
        }
    }
}

fn coerce_to(kind: &str, value: &Value) -> Option<Value> {
    match kind {
        "string" => match value {
            Value::Number(n) => Some(Value::String(n.to_string())),
            Value::Bool(b) => Some(Value::String(b.to_string())),
            Value::Null => Some(Value::String(String::new())),
            _ => None,
        },
        "number" => match value {
            Value::String(s) => parse_number(s).map(Value::Number),
            Value::Bool(b) => Some(Value::from(u8::from(*b))),
            Value::Null => Some(Value::from(0)),
            _ => None,
        },
        "integer" => match value {
            Value::String(s) => parse_number(s)
                .filter(|n| is_integer(&Value::Number(n.clone())))
                .map(|n| Value::Number(integral(n))),
            Value::Bool(b) => Some(Value::from(u8::from(*b))),
            Value::Null => Some(Value::from(0)),
            _ => None,
        },
        "boolean" => match value {
            Value::String(s) if s == "true" => Some(Value::Bool(true)),
            Value::String(s) if s == "false" => Some(Value::Bool(false)),
            Value::Number(n) if n.as_f64() == Some(1.0) => Some(Value::Bool(true)),
            Value::Number(n) if n.as_f64() == Some(0.0) => Some(Value::Bool(false)),
            Value::Null => Some(Value::Bool(false)),
            _ => None,
        },
        "null" => match value {
            Value::String(s) if s.is_empty() => Some(Value::Null),
            Value::Number(n) if n.as_f64() == Some(0.0) => Some(Value::Null),
            Value::Bool(false) => Some(Value::Null),
            _ => None,
        },
        _ => None,
    }
}

fn parse_number(s: &str) -> Option<Number> {
    if let Ok(n) = s.parse::<i64>() {
        return Some(Number::from(n));
    }
    if let Ok(n) = s.parse::<u64>() {
        return Some(Number::from(n));
    }
    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(Number::from_f64)
}

fn integral(n: Number) -> Number {
    match n.as_f64() {
        Some(f) if !n.is_i64() && !n.is_u64() && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
            Number::from(f as i64)
        }
        _ => n,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn query_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "limit": { "type": "integer" },
                "ratio": { "type": "number" },
                "active": { "type": "boolean" },
                "cursor": { "type": ["null", "string"] },
                "sort": { "type": "string" },
                "ids": { "type": "array", "items": { "type": "integer" } },
                "filter": {
                    "type": "object",
                    "additionalProperties": { "type": "integer" }
                }
            }
        })
    }

    #[test]
    fn coerces_strings_to_declared_scalars() {
        let mut query = json!({
            "limit": "10",
            "ratio": "0.5",
            "active": "true",
            "sort": "-a"
        });
        coerce_types(&query_schema(), &mut query);

        assert_eq!(
            query,
            json!({"limit": 10, "ratio": 0.5, "active": true, "sort": "-a"})
        );
    }

    #[test]
    fn integral_decimals_become_integers() {
        let mut query = json!({"limit": "2.0"});
        coerce_types(&query_schema(), &mut query);
        assert_eq!(query, json!({"limit": 2}));
    }

    #[test]
    fn uncoercible_values_are_left_alone() {
        let mut query = json!({"limit": "ten", "ratio": "", "active": "yes"});
        coerce_types(&query_schema(), &mut query);
        assert_eq!(query, json!({"limit": "ten", "ratio": "", "active": "yes"}));

        let mut query = json!({"limit": "1.5"});
        coerce_types(&query_schema(), &mut query);
        assert_eq!(query, json!({"limit": "1.5"}));
    }

    #[test]
    fn matching_union_member_is_not_coerced() {
        let mut query = json!({"cursor": ""});
        coerce_types(&query_schema(), &mut query);
        assert_eq!(query, json!({"cursor": ""}));
    }

    #[test]
    fn follows_items_and_additional_properties() {
        let mut query = json!({"ids": ["1", "2"], "filter": {"min": "3"}});
        coerce_types(&query_schema(), &mut query);
        assert_eq!(query, json!({"ids": [1, 2], "filter": {"min": 3}}));
    }

    #[test]
    fn scalars_coerce_to_string_when_required() {
        let mut query = json!({"sort": 5});
        coerce_types(&query_schema(), &mut query);
        assert_eq!(query, json!({"sort": "5"}));
    }

    #[test]
    fn follows_local_refs() {
        let schema = json!({
            "definitions": { "limit": { "type": "integer", "default": 20 } },
            "properties": { "limit": { "$ref": "#/definitions/limit" } }
        });

        let mut query = json!({"limit": "10"});
        coerce_types(&schema, &mut query);
        assert_eq!(query, json!({"limit": 10}));
    }

    #[test]
    fn follows_combinator_members() {
        let schema = json!({
            "allOf": [
                { "properties": { "limit": { "type": "integer" } } },
                { "properties": { "active": { "anyOf": [{ "type": "boolean" }] } } }
            ],
            "oneOf": [{ "properties": { "ratio": { "type": "number" } } }]
        });

        let mut query = json!({"limit": "10", "active": "false", "ratio": "0.25"});
        coerce_types(&schema, &mut query);
        assert_eq!(query, json!({"limit": 10, "active": false, "ratio": 0.25}));
    }

    #[test]
    fn self_referencing_schema_terminates() {
        let schema = json!({
            "type": "object",
            "allOf": [{ "$ref": "#" }],
            "properties": { "depth": { "type": "integer" } }
        });

        let mut query = json!({"depth": "3"});
        coerce_types(&schema, &mut query);
        assert_eq!(query, json!({"depth": 3}));
    }
}
