//! Shared harness for the declaration-driven integration tests.
//!
//! Each `test_case!` compiles a schema declaration with the built-in rule
//! catalog, runs it over an input, and checks either the sanitized output or
//! the `(pointer, rule)` pairs of the reported failures, in report order.

#![allow(dead_code)]

use once_cell::sync::Lazy;
use serde_json::Value;
use sieve::{CompiledSchema, Error, Validator};

pub static VALIDATOR: Lazy<Validator> = Lazy::new(Validator::default);

pub fn compile(declaration: &Value) -> CompiledSchema {
    match VALIDATOR.compile_declaration(declaration) {
        Ok(schema) => schema,
        Err(e) => panic!("schema failed to compile: {e}\n{declaration:#}"),
    }
}

pub fn failures(err: &Error) -> Vec<(String, String)> {
    let Some(errors) = err.validation_errors() else {
        panic!("expected validation errors, got {err}");
    };
    errors
        .iter()
        .map(|failure| (failure.pointer.clone(), failure.rule.clone()))
        .collect()
}

#[macro_export]
macro_rules! test_case {
    (
        $test_name:ident,
        schema: $schema:expr,
        input: $input:expr,
        output: $output:expr $(,)?
    ) => {
        #[test]
        fn $test_name() {
            let schema = $crate::cases::compile(&$schema);
            match schema.validate(&$input) {
                Ok(output) => pretty_assertions::assert_eq!(output, $output),
                Err(e) => panic!("unexpected failure: {e}\n{}", schema.source()),
            }
        }
    };
    (
        $test_name:ident,
        schema: $schema:expr,
        input: $input:expr,
        errors: [$(($pointer:expr, $rule:expr)),* $(,)?] $(,)?
    ) => {
        #[test]
        fn $test_name() {
            let schema = $crate::cases::compile(&$schema);
            let err = match schema.validate(&$input) {
                Ok(output) => panic!("expected failures, got {output}\n{}", schema.source()),
                Err(e) => e,
            };
            let expected: Vec<(String, String)> =
                vec![$(($pointer.to_string(), $rule.to_string())),*];
            pretty_assertions::assert_eq!($crate::cases::failures(&err), expected);
        }
    };
}
