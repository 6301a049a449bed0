//! JSON Schema validation for request bodies and query parameters.
//!
//! Wraps the `jsonschema` engine with:
//! - a `sortOptions` keyword that checks sort parameters like `a,-b,+c`
//!   against an allow-list,
//! - normalization of engine errors into `{ code, path, message }`,
//! - body and query validation contexts, the latter coercing string query
//!   values into the types the schema declares.
//!
//! ```no_run
//! use reqvalid_schema::RequestValidator;
//! use serde_json::json;
//!
//! let mut query = RequestValidator::query();
//! query.add_schema("list", &json!({
//!     "type": "object",
//!     "properties": {
//!         "sort": { "type": "string", "sortOptions": ["name", "-created"] },
//!         "limit": { "type": "integer" }
//!     }
//! }))?;
//!
//! let mut params = json!({ "sort": "name,-created", "limit": "10" });
//! query.validate("list", &mut params)?;
//! assert_eq!(params["limit"], json!(10));
//! # Ok::<(), reqvalid_schema::SchemaError>(())
//! ```

pub mod coerce;
pub mod config;
pub mod context;
pub mod defaults;
pub mod error;
mod loader;
pub mod normalize;
pub mod sort_options;
pub mod validator;
mod walk;

pub use config::ValidatorConfig;
pub use context::RequestValidator;
pub use error::{Result, SchemaError, ValidationErrors};
pub use normalize::{normalize, NativeError, PointerStyle, ValidationError};
pub use sort_options::{Direction, SortKey, SortOptions, SortViolation};
pub use validator::FormatFn;
