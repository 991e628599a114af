//! Store error model.

use thiserror::Error;

use sesamo_core::DomainError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a record store or document sink.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The addressed record does not exist.
    #[error("record not found")]
    NotFound,

    /// The backend failed; the message is backend-specific. Multi-step
    /// callers must treat prior steps as possibly applied.
    #[error("backend failure: {0}")]
    Backend(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => DomainError::not_found(),
            StoreError::Backend(msg) => DomainError::store(msg),
        }
    }
}
