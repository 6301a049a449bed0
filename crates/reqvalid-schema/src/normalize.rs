//! Conversion of engine error records into the public error shape.

use std::fmt;

use jsonschema::error::ValidationErrorKind;
use serde::{Deserialize, Serialize};

/// Keyword reported for values rejected by a `false` subschema.
pub const FALSE_SCHEMA_KEYWORD: &str = "false schema";

/// How instance locations are rendered in normalized errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerStyle {
    /// JSON pointer, e.g. `/name`. Used for request bodies.
    #[default]
    JsonPointer,
    /// Query parameter path, e.g. `?sort`. Used for request queries.
    QueryPath,
}

/// An error record as produced by the schema engine or a custom keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeError {
    pub keyword: String,
    pub path: String,
    pub message: String,
}

impl NativeError {
    pub fn new(
        keyword: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Extract a record from an engine error.
    ///
    /// The keyword is the last segment of the error's schema location. A
    /// `false` subschema has no keyword there, so it reports `false schema`.
    pub fn from_engine(err: &jsonschema::ValidationError<'_>) -> Self {
        let schema_path = err.schema_path().as_str();
        let keyword = if matches!(err.kind(), ValidationErrorKind::FalseSchema) {
            FALSE_SCHEMA_KEYWORD
        } else {
            schema_path.rsplit('/').next().unwrap_or_default()
        };

        Self {
            keyword: keyword.to_string(),
            path: err.instance_path().as_str().to_string(),
            message: err.to_string(),
        }
    }
}

/// A single validation failure in its public shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Lower snake case keyword identifier, e.g. `min_length`.
    pub code: String,
    /// Location of the offending value.
    pub path: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root) [{}]: {}", self.code, self.message)
        } else {
            write!(f, "{} [{}]: {}", self.path, self.code, self.message)
        }
    }
}

/// Normalize native errors, preserving their order.
///
/// Returns `None` when there are no errors.
pub fn normalize<I>(errors: I, style: PointerStyle) -> Option<Vec<ValidationError>>
where
    I: IntoIterator<Item = NativeError>,
{
    let normalized: Vec<ValidationError> = errors
        .into_iter()
        .map(|err| ValidationError {
            code: snake_case(&err.keyword),
            path: rewrite_path(&err.path, style),
            message: err.message,
        })
        .collect();

    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Render a JSON pointer in the given style. Only the leading separator changes.
pub fn rewrite_path(path: &str, style: PointerStyle) -> String {
    match style {
        PointerStyle::QueryPath if !path.is_empty() => {
            let mut rest = path.chars();
            rest.next();
            format!("?{}", rest.as_str())
        }
        _ => path.to_string(),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Lower,
    Upper,
    Digit,
}

fn classify(c: char) -> Option<CharClass> {
    if c.is_uppercase() {
        Some(CharClass::Upper)
    } else if c.is_numeric() {
        Some(CharClass::Digit)
    } else if c.is_alphabetic() {
        Some(CharClass::Lower)
    } else {
        None
    }
}

/// Convert an identifier to lower snake case.
///
/// Words break on non-alphanumeric characters, on lower-to-upper transitions,
/// between letters and digits, and before the capital that ends an acronym run
/// (`XMLHttp` -> `xml_http`).
pub fn snake_case(input: &str) -> String {
    let classes: Vec<(char, Option<CharClass>)> =
        input.chars().map(|c| (c, classify(c))).collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &(c, class)) in classes.iter().enumerate() {
        let Some(class) = class else {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        };

        let prev = if i > 0 { classes[i - 1].1 } else { None };
        let next = classes.get(i + 1).and_then(|(_, class)| *class);
        let boundary = match (prev, class) {
            (Some(CharClass::Lower), CharClass::Upper) => true,
            (Some(CharClass::Upper), CharClass::Upper) => next == Some(CharClass::Lower),
            (Some(CharClass::Digit), CharClass::Digit) => false,
            (Some(CharClass::Digit), _) | (Some(_), CharClass::Digit) => true,
            _ => false,
        };

        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.extend(c.to_lowercase());
    }

    if !current.is_empty() {
        words.push(current);
    }

    words.join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_matches_keyword_conventions() {
        assert_eq!(snake_case("minLength"), "min_length");
        assert_eq!(snake_case("sort_options"), "sort_options");
        assert_eq!(snake_case("sortOptions"), "sort_options");
        assert_eq!(snake_case("additionalProperties"), "additional_properties");
        assert_eq!(snake_case("required"), "required");
        assert_eq!(snake_case("$ref"), "ref");
        assert_eq!(snake_case("XMLHttpRequest"), "xml_http_request");
        assert_eq!(snake_case("draft7Keyword"), "draft_7_keyword");
        assert_eq!(snake_case(""), "");
    }

    #[test]
    fn query_path_rewrites_leading_separator_only() {
        assert_eq!(rewrite_path("/sort", PointerStyle::QueryPath), "?sort");
        assert_eq!(rewrite_path("/a/b", PointerStyle::QueryPath), "?a/b");
        assert_eq!(rewrite_path("", PointerStyle::QueryPath), "");
    }

    #[test]
    fn json_pointer_passes_through() {
        assert_eq!(rewrite_path("/sort", PointerStyle::JsonPointer), "/sort");
        assert_eq!(rewrite_path("", PointerStyle::JsonPointer), "");
    }

    #[test]
    fn empty_input_normalizes_to_none() {
        assert_eq!(normalize(Vec::new(), PointerStyle::JsonPointer), None);
    }

    #[test]
    fn normalize_preserves_order_and_message() {
        let errors = normalize(
            vec![
                NativeError::new("minLength", "/name", "too short"),
                NativeError::new("sort_options", "/sort", "Sort option is not supported"),
            ],
            PointerStyle::QueryPath,
        )
        .unwrap();

        assert_eq!(
            errors,
            vec![
                ValidationError {
                    code: "min_length".to_string(),
                    path: "?name".to_string(),
                    message: "too short".to_string(),
                },
                ValidationError {
                    code: "sort_options".to_string(),
                    path: "?sort".to_string(),
                    message: "Sort option is not supported".to_string(),
                },
            ]
        );
    }

    #[test]
    fn error_serializes_to_public_shape() {
        let err = ValidationError {
            code: "min_length".to_string(),
            path: "/name".to_string(),
            message: "too short".to_string(),
        };
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"code": "min_length", "path": "/name", "message": "too short"})
        );
    }
}
