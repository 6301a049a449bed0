//! The `sortOptions` schema keyword.
//!
//! Validates a sort query parameter such as `?sort=a,-b,+c` against an
//! allow-list of field names. An unsigned allow-list entry (`a`) accepts
//! either direction; a signed entry (`-b`) accepts only that direction.

use std::collections::HashSet;

use jsonschema::paths::Location;
use jsonschema::{Keyword, ValidationError};
use serde_json::{Map, Value};

/// Keyword name as it appears in schemas.
pub const KEYWORD: &str = "sortOptions";

/// Keyword identifier attached to sort violations before normalization.
pub const ERROR_KEYWORD: &str = "sort_options";

/// Why a sort candidate was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortViolation {
    /// A token names a field (or direction) the allow-list does not permit.
    Unsupported,
    /// The same field appears more than once, in any direction.
    Duplicate,
}

impl SortViolation {
    pub fn message(self) -> &'static str {
        match self {
            SortViolation::Unsupported => "Sort option is not supported",
            SortViolation::Duplicate => "Cannot specify sort option more than once",
        }
    }
}

impl std::fmt::Display for SortViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for SortViolation {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// One accepted entry of a sort parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: Direction,
}

/// Split a sort parameter into signed tokens, defaulting unsigned tokens to `+`.
///
/// An empty candidate yields a single `+` token, which names no field.
pub fn tokenize(candidate: &str) -> Vec<String> {
    candidate
        .split(',')
        .map(|token| {
            if token.starts_with('+') || token.starts_with('-') {
                token.to_string()
            } else {
                format!("+{token}")
            }
        })
        .collect()
}

fn field_name(token: &str) -> &str {
    // Tokens always carry a one-byte sign after `tokenize`.
    &token[1..]
}

/// Allow-list captured from a schema's `sortOptions` argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortOptions {
    allowed: HashSet<String>,
}

impl SortOptions {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from the keyword's schema value: an array of unique strings.
    pub fn from_schema_value(value: &Value) -> Result<Self, String> {
        let items = value
            .as_array()
            .ok_or_else(|| format!("'{KEYWORD}' must be an array of strings"))?;

        let mut allowed = HashSet::with_capacity(items.len());
        for item in items {
            let option = item
                .as_str()
                .ok_or_else(|| format!("'{KEYWORD}' entries must be strings, got {item}"))?;
            if !allowed.insert(option.to_string()) {
                return Err(format!("'{KEYWORD}' entries must be unique, '{option}' repeats"));
            }
        }

        Ok(Self { allowed })
    }

    fn permits(&self, token: &str) -> bool {
        self.allowed.contains(token) || self.allowed.contains(field_name(token))
    }

    /// Check a sort candidate.
    ///
    /// Membership is checked left to right and only the first unsupported
    /// token is reported. Duplicates are checked only once every token passed.
    pub fn check(&self, candidate: &str) -> Result<(), SortViolation> {
        let tokens = tokenize(candidate);
        self.check_tokens(&tokens)
    }

    fn check_tokens(&self, tokens: &[String]) -> Result<(), SortViolation> {
        if !tokens.iter().all(|token| self.permits(token)) {
            return Err(SortViolation::Unsupported);
        }

        let mut seen = HashSet::with_capacity(tokens.len());
        if !tokens.iter().all(|token| seen.insert(field_name(token))) {
            return Err(SortViolation::Duplicate);
        }

        Ok(())
    }

    /// Check a sort candidate and return its typed keys in order.
    pub fn parse(&self, candidate: &str) -> Result<Vec<SortKey>, SortViolation> {
        let tokens = tokenize(candidate);
        self.check_tokens(&tokens)?;

        Ok(tokens
            .iter()
            .map(|token| SortKey {
                field: field_name(token).to_string(),
                direction: if token.starts_with('-') {
                    Direction::Descending
                } else {
                    Direction::Ascending
                },
            })
            .collect())
    }
}

impl Keyword for SortOptions {
    fn validate<'i>(&self, instance: &'i Value) -> Result<(), ValidationError<'i>> {
        match instance {
            Value::String(candidate) => self
                .check(candidate)
                .map_err(|violation| ValidationError::custom(violation.message())),
            _ => Ok(()),
        }
    }

    fn is_valid(&self, instance: &Value) -> bool {
        match instance {
            Value::String(candidate) => self.check(candidate).is_ok(),
            _ => true,
        }
    }
}

/// Keyword factory handed to the schema engine.
pub(crate) fn sort_options_factory<'a>(
    _parent: &'a Map<String, Value>,
    value: &'a Value,
    _path: Location,
) -> Result<Box<dyn Keyword>, ValidationError<'a>> {
    let options = SortOptions::from_schema_value(value).map_err(ValidationError::custom)?;
    Ok(Box::new(options))
}
