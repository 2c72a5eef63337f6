//! Errors surfaced by dial operations.

use thiserror::Error;

use crate::store::StoreError;

/// Failure of a dial read or mutation.
#[derive(Debug, Error)]
pub enum DialError {
    /// The document is missing, unreadable or corrupt. The service cannot
    /// run correctly and must stop.
    #[error("settings document integrity failure: {0}")]
    Integrity(#[source] StoreError),

    /// Writing the document back failed. Only the current request fails.
    #[error("failed to persist settings document: {0}")]
    Persist(#[source] StoreError),
}

impl DialError {
    /// Whether the process should shut down after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DialError::Integrity(_))
    }

    pub fn store_error(&self) -> &StoreError {
        match self {
            DialError::Integrity(e) | DialError::Persist(e) => e,
        }
    }
}
