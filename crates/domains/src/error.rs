//! # DomainError
//!
//! Centralized error handling for the board store.
//! A wrong delete password has no variant here: it is the normal
//! outcome `DeleteOutcome::IncorrectPassword`.

use thiserror::Error;

/// The primary error type for all board operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Missing or empty required field.
    #[error("{0}")]
    Validation(String),

    /// An identifier that is not a well-formed id (names the offending field).
    #[error("invalid {0}")]
    InvalidIdentifier(&'static str),

    /// Referenced thread or reply does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Infrastructure failure (store unreachable, hashing task died, ...)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Errors caused by the caller's input rather than by the service.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, DomainError::Internal(_))
    }
}

/// A specialized Result type for board logic.
pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_identifier_names_the_field() {
        let err = DomainError::InvalidIdentifier("thread_id");
        assert_eq!(err.to_string(), "invalid thread_id");
        assert!(err.is_client_error());
    }

    #[test]
    fn internal_is_not_a_client_error() {
        let err = DomainError::Internal("pool closed".into());
        assert_eq!(err.to_string(), "internal service error: pool closed");
        assert!(!err.is_client_error());
    }
}
