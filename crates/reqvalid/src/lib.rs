//! Request validation with JSON Schema.
//!
//! reqvalid validates request bodies and query parameters against JSON Schema,
//! normalizes engine errors into a stable `{ code, path, message }` shape and
//! adds a `sortOptions` keyword for sort parameters such as `?sort=a,-b,+c`.
//!
//! # Crate Structure
//!
//! - [`schema`]: validation contexts, the `sortOptions` keyword and error normalization

/// Re-export schema types.
pub mod schema {
    pub use reqvalid_schema::*;
}

pub use reqvalid_schema::{
    RequestValidator, SchemaError, SortOptions, ValidationError, ValidationErrors,
    ValidatorConfig,
};
