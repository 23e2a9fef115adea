//! Sieve core: compiles declarative schemas into single-pass validation
//! programs.
//!
//! - [`schema`]: the schema tree and its JSON declaration loader
//! - [`rules`]: the two-phase rule protocol and the built-in catalog
//! - [`compiler`]: schema tree to [`vm::Program`]
//! - [`vm`]: instruction set, program artifact and executor
//! - [`api`]: the [`api::Validator`] entry point

extern crate alloc;

pub mod api;
pub mod compiler;
pub mod errors;
pub mod reporter;
pub mod resolver;
pub mod rules;
pub mod schema;
pub mod values;
pub mod vm;
