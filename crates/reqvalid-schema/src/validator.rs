use jsonschema::Validator;
use serde_json::Value;

use crate::config::ValidatorConfig;
use crate::error::{Result, SchemaError};
use crate::normalize::NativeError;
use crate::sort_options::{sort_options_factory, KEYWORD};

/// A format check usable by the `format` keyword.
pub type FormatFn = fn(&str) -> bool;

/// Compile a schema with the `sortOptions` keyword and custom formats installed.
pub(crate) fn compile(
    schema_id: &str,
    schema: &Value,
    config: &ValidatorConfig,
    formats: &[(String, FormatFn)],
) -> Result<Validator> {
    let mut options = jsonschema::options()
        .with_keyword(KEYWORD, sort_options_factory)
        .should_validate_formats(config.validate_formats);

    for (name, format) in formats {
        options = options.with_format(name.clone(), *format);
    }

    options
        .build(schema)
        .map_err(|err| SchemaError::CompileFailed {
            schema_id: schema_id.to_string(),
            message: err.to_string(),
        })
}

/// Run the engine and collect its errors in report order.
pub(crate) fn native_errors(validator: &Validator, value: &Value) -> Vec<NativeError> {
    validator
        .iter_errors(value)
        .map(|err| NativeError::from_engine(&err))
        .collect()
}
