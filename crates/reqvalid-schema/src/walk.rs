//! Shared schema traversal for the coercion and defaults passes.

use serde_json::{Map, Value};

/// Bound on nested subschema visits, so self-referencing schemas terminate.
pub(crate) const MAX_DEPTH: usize = 64;

/// Applicators that let coercion reach every branch of a schema.
pub(crate) const ALL_APPLICATORS: &[&str] = &["allOf", "anyOf", "oneOf"];

/// Applicators whose defaults are honored. Branch-dependent defaults are not.
pub(crate) const DEFAULT_APPLICATORS: &[&str] = &["allOf"];

/// Resolve a `$ref` pointing into the same document (`#`, `#/definitions/x`).
///
/// Remote and anchor references return `None`; the engine still resolves
/// those during validation.
pub(crate) fn resolve_local<'a>(root: &'a Value, reference: &str) -> Option<&'a Value> {
    let pointer = reference.strip_prefix('#')?;
    if pointer.is_empty() {
        return Some(root);
    }
    if !pointer.starts_with('/') {
        return None;
    }
    root.pointer(pointer)
}

/// Subschemas that apply to the same instance as `schema`: its local `$ref`
/// target followed by the members of the listed applicators.
pub(crate) fn in_place_subschemas<'a>(
    root: &'a Value,
    schema: &'a Map<String, Value>,
    applicators: &[&str],
) -> Vec<&'a Value> {
    let mut subschemas = Vec::new();

    if let Some(target) = schema
        .get("$ref")
        .and_then(Value::as_str)
        .and_then(|reference| resolve_local(root, reference))
    {
        subschemas.push(target);
    }

    for applicator in applicators {
        if let Some(Value::Array(members)) = schema.get(*applicator) {
            subschemas.extend(members.iter());
        }
    }

    subschemas
}
