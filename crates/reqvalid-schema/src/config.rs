use crate::normalize::PointerStyle;

/// Controls how a validation context compiles schemas and treats input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// How instance locations are rendered in errors.
    pub pointer_style: PointerStyle,
    /// When true, string values are coerced into schema-declared types.
    /// Coercion rewrites the caller's data in place.
    pub coerce_types: bool,
    /// When true, missing properties with a schema `default` are filled in.
    pub use_defaults: bool,
    /// When true, the `format` keyword is enforced.
    pub validate_formats: bool,
    /// When true, validating against an unknown schema id is an error.
    pub fail_on_missing_schema: bool,
    /// Maximum number of schemas loaded from a directory.
    pub max_schemas_from_directory: usize,
    /// Maximum bytes allowed per schema file loaded from a directory.
    pub max_schema_file_size: usize,
}

impl ValidatorConfig {
    /// Request bodies: JSON pointer paths, no coercion.
    pub fn body() -> Self {
        Self::default()
    }

    /// Request queries: query paths, string values coerced to declared types.
    pub fn query() -> Self {
        Self {
            pointer_style: PointerStyle::QueryPath,
            coerce_types: true,
            ..Self::default()
        }
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            pointer_style: PointerStyle::JsonPointer,
            coerce_types: false,
            use_defaults: true,
            validate_formats: true,
            fail_on_missing_schema: true,
            max_schemas_from_directory: 256,
            max_schema_file_size: 256 * 1024,
        }
    }
}
