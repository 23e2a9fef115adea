//! The two-phase rule protocol and the built-in rule catalog.
//!
//! Every rule is executed in two phases:
//!
//! 1. **compile**: runs once while the schema is built. It checks the declared
//!    arguments and turns them into a [`CompiledRule`]. Bad arguments are a
//!    [`BuildError`], never a validation failure.
//! 2. **validate**: runs for every input validated against the schema. It
//!    inspects the value, may look up other fields through the
//!    [`RuleContext`], may coerce the value with [`RuleContext::mutate`], and
//!    reports violations instead of returning them.
//!
//! Rules are found by name in a [`RuleRegistry`], both when a schema is built
//! (to run `compile`) and when a program is compiled (to bind the rule that
//! runs `validate`).

use alloc::sync::Arc;
use core::fmt;
use core::future::Future;
use core::pin::Pin;

use hashbrown::HashMap;
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;

use crate::errors::BuildError;

mod context;
pub mod existence;
pub mod primitives;
pub mod structure;

pub use context::{Field, MutateCell, RuleContext};
pub use existence::{Required, RequiredIfNotExistsAll};
pub use primitives::{BooleanRule, NumberRule, StringRule};
pub use structure::{ArrayRule, ObjectRule};

/// Future returned by [`Rule::validate_async`].
pub type BoxFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// A validation rule.
pub trait Rule: Send + Sync {
    /// Name used for registration and reporting.
    fn name(&self) -> &'static str;

    /// Validate the declared arguments and produce the compiled form.
    ///
    /// `subtype` is the node's subtype (`"string"`, `"number"`, ... for
    /// literals, `"object"` or `"array"` for structural nodes).
    fn compile(
        &self,
        subtype: Option<&str>,
        is_array_member: bool,
        args: &[Value],
    ) -> Result<CompiledRule, BuildError>;

    /// Validate one field occurrence. `value` is `None` when undefined.
    fn validate(&self, value: Option<&Value>, options: &Value, ctx: &mut RuleContext<'_>);

    /// Suspending variant, used when the compiled rule is marked async.
    ///
    /// Async rules must override this; the default runs [`Rule::validate`].
    fn validate_async<'a>(
        &'a self,
        value: Option<&'a Value>,
        options: &'a Value,
        ctx: &'a mut RuleContext<'_>,
    ) -> BoxFuture<'a> {
        Box::pin(async move { self.validate(value, options, ctx) })
    }
}

/// Output of a rule's compile phase, reused for every validated input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledRule {
    pub name: String,
    #[serde(rename = "async")]
    pub is_async: bool,
    #[serde(rename = "allowUndefineds")]
    pub allow_undefineds: bool,
    /// Opaque payload handed back to `validate` unchanged.
    #[serde(rename = "compiledOptions")]
    pub compiled_options: Value,
}

impl CompiledRule {
    /// A synchronous rule that skips undefined values and has no options.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_async: false,
            allow_undefineds: false,
            compiled_options: Value::Object(Default::default()),
        }
    }

    pub fn allow_undefineds(mut self) -> Self {
        self.allow_undefineds = true;
        self
    }

    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    pub fn with_options(mut self, options: Value) -> Self {
        self.compiled_options = options;
        self
    }
}

/// Name to rule mapping.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, Arc<dyn Rule>>,
}

static BUILTINS: Lazy<RuleRegistry> = Lazy::new(RuleRegistry::with_builtins);

impl RuleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in catalog.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        register_builtins(&mut registry);
        registry
    }

    /// Shared, lazily built registry of the built-in catalog.
    pub fn builtins() -> &'static RuleRegistry {
        &BUILTINS
    }

    /// Register a rule under its own name, replacing any previous entry.
    pub fn register<R: Rule + 'static>(&mut self, rule: R) {
        self.register_arc(Arc::new(rule));
    }

    pub fn register_arc(&mut self, rule: Arc<dyn Rule>) {
        self.rules.insert(rule.name().to_string(), rule);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Rule>> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Look up a rule, failing the build when it is missing.
    pub fn require(&self, name: &str) -> Result<&Arc<dyn Rule>, BuildError> {
        self.get(name).ok_or_else(|| BuildError::UnknownRule {
            name: name.to_string(),
        })
    }

    /// Run the compile phase of the rule registered as `name`.
    pub fn compile(
        &self,
        name: &str,
        subtype: Option<&str>,
        is_array_member: bool,
        args: &[Value],
    ) -> Result<CompiledRule, BuildError> {
        self.require(name)?.compile(subtype, is_array_member, args)
    }

    /// Registered rule names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Register the whole built-in catalog.
pub fn register_builtins(registry: &mut RuleRegistry) {
    registry.register(Required);
    registry.register(RequiredIfNotExistsAll);
    registry.register(StringRule);
    registry.register(NumberRule);
    registry.register(BooleanRule);
    registry.register(ObjectRule);
    registry.register(ArrayRule);
}

/// Reject rules used on a node whose subtype they do not support.
///
/// Nodes without a subtype are accepted.
pub(crate) fn ensure_subtype(
    rule: &str,
    subtype: Option<&str>,
    allowed: &[&str],
) -> Result<(), BuildError> {
    match subtype {
        Some(subtype) if !allowed.contains(&subtype) => Err(BuildError::invalid_arguments(
            rule,
            format!("cannot be used on \"{subtype}\" type"),
        )),
        _ => Ok(()),
    }
}
