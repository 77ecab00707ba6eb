//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures (validation, domain
/// rules, permissions). `Persistence` is the one exception: it reports a
/// store write that failed after all local checks passed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Missing or malformed required input.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced entity does not exist in the current snapshot.
    #[error("not found: {0}")]
    NotFound(String),

    /// A well-formed operation violates a domain rule.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// The caller's resolved role does not permit the operation.
    #[error("permission denied: {0}")]
    Permission(String),

    /// A write to the backing store failed; local state was not advanced.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    pub fn permission(msg: impl Into<String>) -> Self {
        Self::Permission(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }
}
