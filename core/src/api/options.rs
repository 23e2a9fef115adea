//! Configuration options for the validator.

use crate::reporter::{Deduplication, Messages, Reporter, ReporterStrategy};

/// Configuration options for compilation.
///
/// # Example
///
/// ```
/// use sieve_core::api::CompilationOptions;
///
/// let options = CompilationOptions { comments: false };
/// ```
#[derive(Debug, Clone)]
pub struct CompilationOptions {
    /// Render a `// Validate ...` comment above every field in the program's
    /// source text.
    ///
    /// Default: true
    pub comments: bool,
}

impl Default for CompilationOptions {
    fn default() -> Self {
        Self { comments: true }
    }
}

/// Configuration options for validating one input.
///
/// # Example
///
/// ```
/// use sieve_core::api::ExecutionOptions;
/// use sieve_core::reporter::{Deduplication, Messages, ReporterStrategy};
///
/// let options = ExecutionOptions {
///     strategy: ReporterStrategy::FailFast,
///     deduplication: Deduplication::Additive,
///     messages: Messages::new().with("required", "This field is mandatory"),
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    /// Collect every failure, or stop at the first one.
    ///
    /// Default: collect all
    pub strategy: ReporterStrategy,

    /// How failures reported below arrays are deduplicated.
    ///
    /// Default: additive
    pub deduplication: Deduplication,

    /// Message overrides, see [`Messages`].
    pub messages: Messages,
}

impl ExecutionOptions {
    /// A fresh reporter configured by these options.
    pub fn reporter(&self) -> Reporter {
        Reporter::new(self.strategy, self.deduplication, self.messages.clone())
    }
}

/// Configuration options for the validator.
///
/// These set the defaults for compilation and execution, which can be
/// overridden on a per-call basis.
#[derive(Debug, Clone, Default)]
pub struct ValidatorOptions {
    /// Default options for compilation.
    ///
    /// These can be overridden when calling `Validator::compile_with()`.
    pub default_compilation_options: CompilationOptions,

    /// Default options for execution.
    ///
    /// These can be overridden when calling `CompiledSchema::validate_with()`.
    pub default_execution_options: ExecutionOptions,
}
