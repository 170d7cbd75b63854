//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// malformed codes, missing references). Transport concerns belong to the
/// client crate. Note that an unsatisfiable allocation is *not* an error
/// anywhere in this workspace; callers inspect the allocation remainder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. missing code, non-positive quantity).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A composite code was malformed (e.g. unparseable SKU code).
    #[error("invalid code: {0}")]
    InvalidCode(String),

    /// A referenced SKU or location is unknown.
    #[error("not found: {0}")]
    NotFound(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_code(msg: impl Into<String>) -> Self {
        Self::InvalidCode(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}
