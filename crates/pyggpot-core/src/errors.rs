//! Unified error types for pyggpot
//!
//! Two layers: [`StoreError`] is what a ledger store handler can report, and
//! [`PotError`] is what a ledger operation can report. Every store error
//! converts into a pot error unmodified.

use crate::types::RowId;

/// Failure reported by a ledger store handler.
///
/// Any of these aborts the enclosing transaction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Opening a transaction failed
    #[error("Failed to begin transaction: {0}")]
    BeginFailed(String),

    /// Reading rows failed
    #[error("Read failed: {0}")]
    ReadFailed(String),

    /// Inserting, updating or deleting a row failed
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// Publishing the transaction's writes failed
    #[error("Commit failed: {0}")]
    CommitFailed(String),

    /// Update or delete addressed a row that does not exist
    #[error("Row not found: {0}")]
    RowNotFound(RowId),
}

/// Failure reported by a ledger operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PotError {
    /// Malformed caller input; raised before any transaction starts
    #[error("Invalid: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// Persistence failure; the transaction has been rolled back
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Internal bookkeeping invariant violated
    #[error("Consistency violation: {message}")]
    Consistency {
        /// Which invariant broke
        message: String,
    },
}

impl PotError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a consistency error
    pub fn consistency(message: impl Into<String>) -> Self {
        Self::Consistency {
            message: message.into(),
        }
    }

    /// Whether retrying the whole operation might succeed.
    ///
    /// Only store failures can be transient, and a missing row will still be
    /// missing on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(err) if !matches!(err, StoreError::RowNotFound(_)))
    }
}

/// Standard Result type for pyggpot operations
pub type Result<T> = std::result::Result<T, PotError>;
