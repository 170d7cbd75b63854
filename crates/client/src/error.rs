//! Client-side error model.

use stockdeck_core::DomainError;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Failure at the client boundary.
///
/// Local validation failures reject before any network call and leave the
/// record store untouched; transport and API failures likewise never
/// change local state, so callers may retry with the same request.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected locally before any network call.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Transport-level failure (connect, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status from the backend.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the wire contract.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ClientError {
    /// True when the backend reported the referenced SKU or location as
    /// unknown.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
            || matches!(self, Self::Domain(DomainError::NotFound(_)))
    }
}
