use serde_json::Value;

use crate::walk::{in_place_subschemas, resolve_local, DEFAULT_APPLICATORS, MAX_DEPTH};

/// Fill in missing object properties from their schema `default`, in place.
///
/// Recurses through `properties` and `items` so nested objects get their
/// defaults too. Local `$ref` targets and `allOf` members contribute defaults;
/// `anyOf`/`oneOf` branches do not, since which branch applies is unknown.
pub fn apply_defaults(schema: &Value, value: &mut Value) {
    fill_node(schema, schema, value, 0);
}

fn fill_node(root: &Value, schema: &Value, value: &mut Value, depth: usize) {
    if depth > MAX_DEPTH {
        return;
    }
    let Value::Object(schema) = schema else {
        return;
    };

    match value {
        Value::Object(object) => {
            if let Some(Value::Object(properties)) = schema.get("properties") {
                for (key, property) in properties {
                    if object.contains_key(key) {
                        continue;
                    }
                    if let Some(default) = default_of(root, property) {
                        object.insert(key.clone(), default.clone());
                    }
                }

                for (key, child) in object.iter_mut() {
                    if let Some(property) = properties.get(key) {
                        fill_node(root, property, child, depth + 1);
                    }
                }
            }
        }
        Value::Array(items) => {
            if let Some(item_schema @ Value::Object(_)) = schema.get("items") {
                for item in items.iter_mut() {
                    fill_node(root, item_schema, item, depth + 1);
                }
            }
        }
        _ => {}
    }

    for subschema in in_place_subschemas(root, schema, DEFAULT_APPLICATORS) {
        fill_node(root, subschema, value, depth + 1);
    }
}

/// The property's own `default`, else the first one along its `$ref` chain.
fn default_of<'a>(root: &'a Value, property: &'a Value) -> Option<&'a Value> {
    let mut current = property;
    for _ in 0..MAX_DEPTH {
        if let Some(default) = current.get("default") {
            return Some(default);
        }
        let reference = current.get("$ref")?.as_str()?;
        current = resolve_local(root, reference)?;
    }
    None
}
