//! Public error type for the Sieve API.
//!
//! Internal errors are converted to this type at API boundaries.

use thiserror::Error;

use crate::errors::{BuildError, ExecutionError};
use crate::reporter::ValidationErrors;

/// Public error type for all Sieve operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The schema could not be built or compiled.
    #[error("schema error: {0}")]
    Build(#[from] BuildError),

    /// The input failed validation.
    #[error("validation failed with {} error(s)", .0.len())]
    Validation(ValidationErrors),

    /// The program could not run to completion.
    #[error("execution error: {0}")]
    Execution(String),
}

impl Error {
    /// The reported failures, for validation errors.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Error::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}

impl From<ExecutionError> for Error {
    fn from(err: ExecutionError) -> Self {
        match err {
            ExecutionError::Validation(errors) => Error::Validation(errors),
            other @ ExecutionError::AsyncRule { .. } => Error::Execution(other.to_string()),
        }
    }
}
