//! State error types

use handel_primitives::Address;
use thiserror::Error;

/// State provider errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Snapshot handle does not belong to the current journal
    #[error("unknown snapshot {position} (journal length {journal_len})")]
    UnknownSnapshot {
        /// Position carried by the handle
        position: usize,
        /// Current journal length
        journal_len: usize,
    },

    /// Operation requires an existing account
    #[error("account not found: {0}")]
    AccountNotFound(Address),

    /// Code hash was never stored
    #[error("unknown code hash: {0}")]
    UnknownCode(handel_primitives::H256),
}

/// Result type for state operations
pub type StateResult<T> = Result<T, StateError>;
