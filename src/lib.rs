//! Sieve - schema-driven validation compiled to single-pass programs
//!
//! # Overview
//!
//! A schema describes the expected shape of an input: nested objects, arrays
//! and scalar fields, each carrying an ordered list of validation rules. Sieve
//! compiles the schema once into a program that walks an input a single time,
//! checks every field against its rules, coerces values where rules ask for it,
//! and produces a sanitized output holding only the declared fields.
//!
//! Common use cases include:
//!
//! - Request body validation in HTTP services
//! - Configuration file checking
//! - Sanitizing untrusted JSON before it reaches business logic
//!
//! # Quick Start
//!
//! ```
//! use serde_json::json;
//! use sieve::{Validator, ValidatorOptions};
//!
//! let validator = Validator::new(ValidatorOptions::default());
//! let schema = validator
//!     .compile_declaration(&json!({
//!         "type": "object",
//!         "children": {
//!             "user": {
//!                 "type": "object",
//!                 "rules": ["object"],
//!                 "children": {
//!                     "username": {"type": "literal", "subtype": "string", "rules": ["required", "string"]},
//!                     "age": {"type": "literal", "subtype": "number", "rules": ["number"]}
//!                 }
//!             }
//!         }
//!     }))
//!     .unwrap();
//!
//! let output = schema
//!     .validate(&json!({"user": {"username": "bob", "age": "42", "admin": true}}))
//!     .unwrap();
//! assert_eq!(output, json!({"user": {"username": "bob", "age": 42}}));
//! ```
//!
//! # Custom Rules
//!
//! Implement [`Rule`] and register it when building the validator:
//!
//! ```ignore
//! let validator = Validator::with_rules(ValidatorOptions::default(), |rules| {
//!     rules.register(UniqueEmail::new(pool));
//! });
//! ```
//!
//! Rules whose compiled form is marked async run through
//! [`CompiledSchema::validate_async`].

mod error_renderer;

// Re-export public API from sieve_core
pub use sieve_core::api::{
    CompilationOptions, CompiledSchema, Error, ExecutionOptions, Validator, ValidatorOptions,
};

// Re-export the schema model and the rule protocol
pub use sieve_core::errors::{BuildError, ExecutionError};
pub use sieve_core::reporter::{
    Deduplication, ErrorReporter, Messages, Reporter, ReporterStrategy, ValidationErrors,
    ValidationFailure,
};
pub use sieve_core::resolver::resolve;
pub use sieve_core::rules::{
    self, BoxFuture, CompiledRule, Field, Rule, RuleContext, RuleRegistry,
};
pub use sieve_core::schema::{self, ArrayNode, LiteralNode, NodeKind, ObjectNode, SchemaNode};
pub use sieve_core::vm::Program;

pub use error_renderer::{render_error, render_error_to, render_error_to_string};
