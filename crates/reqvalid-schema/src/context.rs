use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::coerce::coerce_types;
use crate::config::ValidatorConfig;
use crate::defaults::apply_defaults;
use crate::error::{Result, SchemaError, ValidationErrors};
use crate::loader::read_schema_dir;
use crate::normalize::{normalize, PointerStyle, ValidationError};
use crate::validator::{compile, native_errors, FormatFn};

struct CompiledSchema {
    source: Value,
    validator: jsonschema::Validator,
}

/// A configured validation context holding compiled schemas keyed by id.
///
/// Build one per kind of input at startup (see [`RequestValidator::body`] and
/// [`RequestValidator::query`]) and share it by reference. Validation takes
/// `&self`; registration takes `&mut self`.
pub struct RequestValidator {
    schemas: HashMap<String, CompiledSchema>,
    formats: Vec<(String, FormatFn)>,
    config: ValidatorConfig,
}

impl RequestValidator {
    /// Create an empty context with default (body) config.
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    /// Create an empty context with explicit config.
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self {
            schemas: HashMap::new(),
            formats: Vec::new(),
            config,
        }
    }

    /// Context for request bodies: JSON pointer paths, no type coercion.
    pub fn body() -> Self {
        Self::with_config(ValidatorConfig::body())
    }

    /// Context for request queries: `?name` paths, string values coerced to
    /// schema types. Validation rewrites the caller's data in place.
    pub fn query() -> Self {
        Self::with_config(ValidatorConfig::query())
    }

    /// Register a custom format for schemas added after this call.
    pub fn add_format(&mut self, name: impl Into<String>, format: FormatFn) {
        self.formats.push((name.into(), format));
    }

    /// Register a schema from a JSON string.
    pub fn add_schema_json(&mut self, schema_id: &str, schema_json: &str) -> Result<()> {
        let schema: Value = serde_json::from_str(schema_json)?;
        self.add_schema(schema_id, &schema)
    }

    /// Compile and register a schema. An existing schema with the same id is
    /// replaced.
    pub fn add_schema(&mut self, schema_id: &str, schema: &Value) -> Result<()> {
        let validator = compile(schema_id, schema, &self.config, &self.formats)?;
        debug!(schema_id, "registered schema");

        self.schemas.insert(
            schema_id.to_string(),
            CompiledSchema {
                source: schema.clone(),
                validator,
            },
        );
        Ok(())
    }

    /// Load every `<id>.schema.json` in a directory into a new context.
    pub fn from_directory(path: &Path, config: ValidatorConfig) -> Result<Self> {
        let mut context = Self::with_config(config);
        for (schema_id, schema) in read_schema_dir(path, &context.config)? {
            context.add_schema(&schema_id, &schema)?;
        }
        debug!(path = %path.display(), count = context.schemas.len(), "loaded schema directory");
        Ok(context)
    }

    /// Validate, failing with [`SchemaError::Validation`] carrying every
    /// normalized error when `data` does not conform.
    pub fn validate(&self, schema_id: &str, data: &mut Value) -> Result<()> {
        match self.errors(schema_id, data)? {
            Some(errors) => Err(ValidationErrors::new(errors).into()),
            None => Ok(()),
        }
    }

    /// Validate and return the normalized errors, or `None` when `data`
    /// conforms.
    ///
    /// Defaults and (for coercing contexts) type coercion are applied to
    /// `data` before validation.
    pub fn errors(&self, schema_id: &str, data: &mut Value) -> Result<Option<Vec<ValidationError>>> {
        let Some(compiled) = self.schemas.get(schema_id) else {
            if self.config.fail_on_missing_schema {
                return Err(SchemaError::NoSchema(schema_id.to_string()));
            }
            return Ok(None);
        };

        if self.config.use_defaults {
            apply_defaults(&compiled.source, data);
        }
        if self.config.coerce_types {
            coerce_types(&compiled.source, data);
        }

        let errors = normalize(
            native_errors(&compiled.validator, data),
            self.config.pointer_style,
        );
        if let Some(errors) = &errors {
            debug!(schema_id, count = errors.len(), "validation failed");
        }
        Ok(errors)
    }

    /// Validate, either failing with the aggregate error (`throw_on_error`)
    /// or returning the errors as data.
    pub fn validate_with(
        &self,
        schema_id: &str,
        data: &mut Value,
        throw_on_error: bool,
    ) -> Result<Option<Vec<ValidationError>>> {
        let errors = self.errors(schema_id, data)?;
        match errors {
            Some(errors) if throw_on_error => Err(ValidationErrors::new(errors).into()),
            errors => Ok(errors),
        }
    }

    /// Check if a schema is registered under `schema_id`.
    pub fn has_schema(&self, schema_id: &str) -> bool {
        self.schemas.contains_key(schema_id)
    }

    /// Get registered schema ids, sorted.
    pub fn schema_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn pointer_style(&self) -> PointerStyle {
        self.config.pointer_style
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new()
    }
}
