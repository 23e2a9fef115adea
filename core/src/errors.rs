//! Internal error types.
//!
//! Two disjoint classes exist. [`BuildError`]s are programming errors in a
//! schema definition and abort compilation before any program is produced.
//! [`ExecutionError`]s happen while a compiled program runs against an input.

use thiserror::Error;

use crate::reporter::ValidationErrors;

/// Errors detected while building or compiling a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A rule name that is not present in the rule registry.
    #[error("unknown rule \"{name}\"")]
    UnknownRule { name: String },

    /// A rule rejected its declared arguments.
    #[error("{rule}: {reason}")]
    InvalidArguments { rule: String, reason: String },

    /// The schema tree (or its declaration) has the wrong shape.
    #[error("malformed schema at \"{path}\": {reason}")]
    MalformedSchema { path: String, reason: String },

    /// The root of a schema must be an object node without rules.
    #[error("invalid schema root: {reason}")]
    InvalidRoot { reason: String },
}

impl BuildError {
    pub fn invalid_arguments(rule: &str, reason: impl Into<String>) -> Self {
        BuildError::InvalidArguments {
            rule: rule.to_string(),
            reason: reason.into(),
        }
    }

    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        BuildError::MalformedSchema {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Errors produced while running a compiled program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// One or more rules reported a violation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// A program containing async rules was run synchronously.
    #[error("rule \"{rule}\" is async; use `run_async` to execute this program")]
    AsyncRule { rule: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_messages() {
        assert_eq!(
            BuildError::UnknownRule { name: "email".into() }.to_string(),
            "unknown rule \"email\""
        );
        assert_eq!(
            BuildError::invalid_arguments("requiredIfNotExistsAll", "expects an array of \"fields\"")
                .to_string(),
            "requiredIfNotExistsAll: expects an array of \"fields\""
        );
        assert_eq!(
            BuildError::malformed("user.tags", "unknown node type \"set\"").to_string(),
            "malformed schema at \"user.tags\": unknown node type \"set\""
        );
    }
}
