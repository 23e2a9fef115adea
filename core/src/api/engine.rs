//! The Sieve validator.

use serde_json::Value;
use tracing::debug;

use super::{CompilationOptions, CompiledSchema, Error, ValidatorOptions};
use crate::compiler::Compiler;
use crate::rules::RuleRegistry;
use crate::schema::SchemaNode;

/// Builds and compiles schemas against one rule registry.
///
/// The validator manages:
/// - The rule registry (built-in catalog plus custom rules)
/// - Default options for compilation and execution
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use sieve_core::api::{Validator, ValidatorOptions};
///
/// let validator = Validator::new(ValidatorOptions::default());
/// let schema = validator
///     .compile_declaration(&json!({
///         "type": "object",
///         "children": {
///             "username": {"type": "literal", "subtype": "string", "rules": ["required", "string"]}
///         }
///     }))
///     .unwrap();
///
/// let output = schema.validate(&json!({"username": "bob", "admin": true})).unwrap();
/// assert_eq!(output, json!({"username": "bob"}));
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    registry: RuleRegistry,
    options: ValidatorOptions,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidatorOptions::default())
    }
}

impl Validator {
    /// A validator using the built-in rule catalog.
    pub fn new(options: ValidatorOptions) -> Self {
        Self::with_rules(options, |_| {})
    }

    /// A validator whose registry is extended by `init`, after the built-in
    /// catalog has been registered.
    ///
    /// ```ignore
    /// let validator = Validator::with_rules(options, |rules| {
    ///     rules.register(UniqueEmail::new(pool));
    /// });
    /// ```
    pub fn with_rules(options: ValidatorOptions, init: impl FnOnce(&mut RuleRegistry)) -> Self {
        let mut registry = RuleRegistry::with_builtins();
        init(&mut registry);
        Self { registry, options }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Build a schema tree from its JSON declaration.
    pub fn schema(&self, declaration: &Value) -> Result<SchemaNode, Error> {
        Ok(SchemaNode::from_declaration(declaration, &self.registry)?)
    }

    /// Compile a schema with the default compilation options.
    pub fn compile(&self, schema: &SchemaNode) -> Result<CompiledSchema, Error> {
        self.compile_with(self.options.default_compilation_options.clone(), schema)
    }

    /// Compile a schema with explicit compilation options.
    pub fn compile_with(
        &self,
        options: CompilationOptions,
        schema: &SchemaNode,
    ) -> Result<CompiledSchema, Error> {
        let program = Compiler::compile(&self.registry, options, schema)?;
        Ok(CompiledSchema::new(
            program,
            self.options.default_execution_options.clone(),
        ))
    }

    /// Build and compile a schema declaration in one call.
    pub fn compile_declaration(&self, declaration: &Value) -> Result<CompiledSchema, Error> {
        let schema = self.schema(declaration)?;
        debug!("schema declaration loaded");
        self.compile(&schema)
    }

    /// Like [`Validator::compile_declaration`], parsing JSON source text.
    pub fn compile_str(&self, source: &str) -> Result<CompiledSchema, Error> {
        let schema = SchemaNode::from_json_str(source, &self.registry)?;
        self.compile(&schema)
    }
}
