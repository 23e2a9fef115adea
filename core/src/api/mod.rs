//! Public API for Sieve.
//!
//! A [`Validator`] builds schemas from declarations and compiles them against
//! its rule registry. The resulting [`CompiledSchema`] validates inputs and
//! returns their sanitized form.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sieve_core::api::{ExecutionOptions, Validator};
//! use sieve_core::reporter::ReporterStrategy;
//!
//! let validator = Validator::default();
//! let schema = validator
//!     .compile_declaration(&json!({
//!         "type": "object",
//!         "children": {
//!             "age": {"type": "literal", "subtype": "number", "rules": ["required", "number"]},
//!             "email": {"type": "literal", "subtype": "string", "rules": ["required", "string"]}
//!         }
//!     }))
//!     .unwrap();
//!
//! // Numeric strings are coerced.
//! let output = schema.validate(&json!({"age": "42", "email": "a@b.com"})).unwrap();
//! assert_eq!(output, json!({"age": 42, "email": "a@b.com"}));
//!
//! // Fail-fast stops at the first failure.
//! let options = ExecutionOptions {
//!     strategy: ReporterStrategy::FailFast,
//!     ..ExecutionOptions::default()
//! };
//! let err = schema.validate_with(&options, &json!({})).unwrap_err();
//! assert_eq!(err.validation_errors().map(|e| e.len()), Some(1));
//! ```

pub mod compiled;
pub mod engine;
pub mod error;
pub mod options;

pub use compiled::CompiledSchema;
pub use engine::Validator;
pub use error::Error;
pub use options::{CompilationOptions, ExecutionOptions, ValidatorOptions};
