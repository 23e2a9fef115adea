//! Compiled schemas.

use alloc::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::{Error, ExecutionOptions};
use crate::reporter::ErrorReporter;
use crate::vm::Program;

/// A compiled schema ready to validate inputs.
///
/// Compiled schemas own their program and are cheap to clone, so one compiled
/// schema can serve any number of concurrent validations.
///
/// # Execution
///
/// - **`validate()`**: synchronous, fails if the schema uses async rules
/// - **`validate_async()`**: awaits async rules in place, in schema order
///
/// Both return the sanitized output: only the fields whose rules ran, with
/// their possibly coerced values.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    program: Arc<Program>,
    options: ExecutionOptions,
}

impl CompiledSchema {
    /// This is called internally by `Validator::compile()`.
    pub(crate) fn new(program: Program, options: ExecutionOptions) -> Self {
        Self {
            program: Arc::new(program),
            options,
        }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// The default execution options.
    pub fn options(&self) -> &ExecutionOptions {
        &self.options
    }

    /// Source text the compiled program is equivalent to.
    pub fn source(&self) -> String {
        self.program.to_string()
    }

    pub fn is_async(&self) -> bool {
        self.program.is_async()
    }

    /// Validate `input` with the default execution options.
    pub fn validate(&self, input: &Value) -> Result<Value, Error> {
        self.validate_with(&self.options, input)
    }

    /// Validate `input` with explicit execution options.
    pub fn validate_with(&self, options: &ExecutionOptions, input: &Value) -> Result<Value, Error> {
        let mut reporter = options.reporter();
        self.validate_with_reporter(input, &mut reporter)
    }

    /// Validate `input`, reporting failures to a caller-provided reporter.
    pub fn validate_with_reporter(
        &self,
        input: &Value,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<Value, Error> {
        let result = self.program.run(input, reporter);
        if let Err(err) = &result {
            debug!(error = %err, "validation failed");
        }
        Ok(result?)
    }

    /// Validate `input`, awaiting async rules.
    pub async fn validate_async(&self, input: &Value) -> Result<Value, Error> {
        self.validate_async_with(&self.options, input).await
    }

    pub async fn validate_async_with(
        &self,
        options: &ExecutionOptions,
        input: &Value,
    ) -> Result<Value, Error> {
        let mut reporter = options.reporter();
        let result = self.program.run_async(input, &mut reporter).await;
        if let Err(err) = &result {
            debug!(error = %err, "validation failed");
        }
        Ok(result?)
    }
}
