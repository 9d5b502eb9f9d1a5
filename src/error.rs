//! Crate error type.
//!
//! Validation failures are fatal to the call that raised them. Solver
//! outcomes such as infeasibility or timeouts are not errors; they are
//! reported through [`SolveStatus`](crate::solver::SolveStatus).

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors raised by problem construction and the exact pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// The problem data (or a sequence over it) is malformed.
    #[error("invalid problem data: {}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    /// None of the candidate solver backends is usable.
    #[error("no compatible solver backend found (tried: {attempted})\n{remediation}")]
    BackendUnavailable {
        /// Comma-separated backend names, in probing order.
        attempted: String,
        /// How to make each candidate available.
        remediation: String,
    },

    /// A backend failed for a reason other than the model's outcome.
    #[error("solver backend '{backend}' failed: {message}")]
    Backend {
        /// Backend name.
        backend: &'static str,
        /// Backend-provided description.
        message: String,
    },
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Validation errors carried by this error, if any.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::Validation(errors) => errors,
            _ => &[],
        }
    }
}

impl From<Vec<ValidationError>> for Error {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Validation(errors)
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_validation_display_joins_messages() {
        let err = Error::from(vec![
            ValidationError::new(ValidationErrorKind::EmptyProblem, "no jobs"),
            ValidationError::new(ValidationErrorKind::EmptyProblem, "no stages"),
        ]);
        assert_eq!(err.to_string(), "invalid problem data: no jobs; no stages");
        assert_eq!(err.validation_errors().len(), 2);
    }

    #[test]
    fn test_backend_unavailable_display() {
        let err = Error::BackendUnavailable {
            attempted: "highs".into(),
            remediation: "enable the `milp` feature".into(),
        };
        let text = err.to_string();
        assert!(text.contains("tried: highs"));
        assert!(text.contains("milp"));
        assert!(err.validation_errors().is_empty());
    }
}
