//! Runtime validation context handed to every rule invocation.

use core::fmt;

use serde_json::Value;

use crate::reporter::ErrorReporter;
use crate::resolver;

/// Name of the field being validated: an object key or an array index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<'a> {
    Name(&'a str),
    Index(usize),
}

impl fmt::Display for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name(name) => write!(f, "{name}"),
            Field::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Write-back slot for one field occurrence.
///
/// A rule that coerces a value stores the replacement here. The program moves
/// it into the field's binding as soon as the rule returns, so subsequent rules
/// and the output copy observe the new value.
#[derive(Debug, Default)]
pub struct MutateCell {
    replacement: Option<Value>,
}

impl MutateCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, value: Value) {
        self.replacement = Some(value);
    }

    pub fn is_set(&self) -> bool {
        self.replacement.is_some()
    }

    pub fn take(&mut self) -> Option<Value> {
        self.replacement.take()
    }
}

/// Everything a rule can see about the field occurrence it validates.
pub struct RuleContext<'a> {
    /// The full input document.
    pub root: &'a Value,
    /// Nearest enclosing container of the field.
    pub tip: Option<&'a Value>,
    pub field: Field<'a>,
    /// Dot-joined path from the root, with concrete array indices.
    pub pointer: &'a str,
    /// Same path with array indices replaced by `*`. Only set below arrays.
    pub array_expression_pointer: Option<&'a str>,
    cell: &'a mut MutateCell,
    reporter: &'a mut dyn ErrorReporter,
}

impl<'a> RuleContext<'a> {
    /// Context for a field whose tip is the document root.
    pub fn new(
        root: &'a Value,
        field: Field<'a>,
        pointer: &'a str,
        cell: &'a mut MutateCell,
        reporter: &'a mut dyn ErrorReporter,
    ) -> Self {
        Self {
            root,
            tip: Some(root),
            field,
            pointer,
            array_expression_pointer: None,
            cell,
            reporter,
        }
    }

    pub fn with_tip(mut self, tip: Option<&'a Value>) -> Self {
        self.tip = tip;
        self
    }

    pub fn with_array_expression_pointer(mut self, pointer: Option<&'a str>) -> Self {
        self.array_expression_pointer = pointer;
        self
    }

    /// Replace the field's value for subsequent rules and the output.
    pub fn mutate(&mut self, value: Value) {
        self.cell.set(value);
    }

    /// Resolve another field, see [`resolver::resolve`].
    pub fn resolve(&self, reference: &str) -> Option<&'a Value> {
        resolver::resolve(reference, self.root, self.tip)
    }

    /// Report a violation of `rule` at this field's pointer.
    pub fn report(&mut self, rule: &str, message: &str) {
        self.reporter
            .report(self.pointer, rule, message, self.array_expression_pointer);
    }

    /// Direct access to the reporter, for rules that report elsewhere.
    pub fn error_reporter(&mut self) -> &mut dyn ErrorReporter {
        &mut *self.reporter
    }
}

impl fmt::Debug for RuleContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleContext")
            .field("field", &self.field)
            .field("pointer", &self.pointer)
            .field("array_expression_pointer", &self.array_expression_pointer)
            .field("tip", &self.tip)
            .finish_non_exhaustive()
    }
}
