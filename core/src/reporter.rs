//! Validation failure reporting.
//!
//! Rules never fail by returning errors. They report violations to an
//! [`ErrorReporter`], which decides whether validation continues (collect-all)
//! or stops at the first violation (fail-fast), and how the failures are
//! surfaced once the program finishes.

use core::fmt;

use hashbrown::{HashMap, HashSet};
use serde::Serialize;

/// Receives violations while a compiled program runs against one input.
pub trait ErrorReporter: Send {
    /// Record a violation of `rule` at `pointer`.
    ///
    /// `array_expression_pointer` is set for fields below an array, with every
    /// index replaced by `*`.
    fn report(
        &mut self,
        pointer: &str,
        rule: &str,
        message: &str,
        array_expression_pointer: Option<&str>,
    );

    /// Whether any violation has been recorded.
    fn has_errors(&self) -> bool;

    /// Checked after every rule invocation. Returning true stops the program.
    fn should_halt(&self) -> bool {
        false
    }

    /// Hand over the aggregated failures, if any.
    fn finish(&mut self) -> Result<(), ValidationErrors>;
}

/// How a [`Reporter`] reacts to a violation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReporterStrategy {
    /// Keep validating and collect every violation.
    #[default]
    CollectAll,
    /// Stop validating after the first violation.
    FailFast,
}

/// What to do with repeated failures that share an array expression pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Deduplication {
    /// Every report is kept.
    #[default]
    Additive,
    /// Keep only the first failure per `(array expression pointer, rule)`.
    /// Failures outside arrays are never collapsed.
    PerArrayExpression,
}

/// Custom failure messages.
///
/// Looked up by `"{pointer}.{rule}"`, then `"{array_expression_pointer}.{rule}"`,
/// then `"{rule}"`. The rule's own message is used when nothing matches.
#[derive(Debug, Clone, Default)]
pub struct Messages {
    entries: HashMap<String, String>,
}

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.entries.insert(key.into(), message.into());
    }

    pub fn with(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.insert(key, message);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve the message for one failure.
    pub fn resolve<'m>(
        &'m self,
        pointer: &str,
        rule: &str,
        array_expression_pointer: Option<&str>,
        default: &'m str,
    ) -> &'m str {
        if self.entries.is_empty() {
            return default;
        }

        let by_pointer = format!("{pointer}.{rule}");
        if let Some(message) = self.entries.get(&by_pointer) {
            return message;
        }
        if let Some(expression) = array_expression_pointer {
            let by_expression = format!("{expression}.{rule}");
            if let Some(message) = self.entries.get(&by_expression) {
                return message;
            }
        }
        self.entries.get(rule).map(String::as_str).unwrap_or(default)
    }
}

/// A single reported violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    pub pointer: String,
    pub rule: String,
    pub message: String,
    #[serde(rename = "arrayExpressionPointer", skip_serializing_if = "Option::is_none")]
    pub array_expression_pointer: Option<String>,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.pointer, self.message, self.rule)
    }
}

/// Aggregate of every failure reported while validating one input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(transparent)]
#[error("validation failed with {} error(s)", .failures.len())]
pub struct ValidationErrors {
    pub failures: Vec<ValidationFailure>,
}

impl ValidationErrors {
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationFailure> {
        self.failures.iter()
    }

    /// Failures reported at `pointer`.
    pub fn at<'a>(&'a self, pointer: &'a str) -> impl Iterator<Item = &'a ValidationFailure> {
        self.failures.iter().filter(move |f| f.pointer == pointer)
    }
}

/// The default reporter.
#[derive(Debug, Default)]
pub struct Reporter {
    strategy: ReporterStrategy,
    deduplication: Deduplication,
    messages: Messages,
    failures: Vec<ValidationFailure>,
    seen_expressions: HashSet<(String, String)>,
}

impl Reporter {
    pub fn new(strategy: ReporterStrategy, deduplication: Deduplication, messages: Messages) -> Self {
        Self {
            strategy,
            deduplication,
            messages,
            failures: Vec::new(),
            seen_expressions: HashSet::new(),
        }
    }

    pub fn collect_all() -> Self {
        Self::default()
    }

    pub fn fail_fast() -> Self {
        Self::new(ReporterStrategy::FailFast, Deduplication::default(), Messages::new())
    }

    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }
}

impl ErrorReporter for Reporter {
    fn report(
        &mut self,
        pointer: &str,
        rule: &str,
        message: &str,
        array_expression_pointer: Option<&str>,
    ) {
        if let (Deduplication::PerArrayExpression, Some(expression)) =
            (self.deduplication, array_expression_pointer)
        {
            let key = (expression.to_string(), rule.to_string());
            if !self.seen_expressions.insert(key) {
                return;
            }
        }

        let message = self
            .messages
            .resolve(pointer, rule, array_expression_pointer, message);

        self.failures.push(ValidationFailure {
            pointer: pointer.to_string(),
            rule: rule.to_string(),
            message: message.to_string(),
            array_expression_pointer: array_expression_pointer.map(str::to_string),
        });
    }

    fn has_errors(&self) -> bool {
        !self.failures.is_empty()
    }

    fn should_halt(&self) -> bool {
        self.strategy == ReporterStrategy::FailFast && self.has_errors()
    }

    fn finish(&mut self) -> Result<(), ValidationErrors> {
        self.seen_expressions.clear();
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                failures: core::mem::take(&mut self.failures),
            })
        }
    }
}
