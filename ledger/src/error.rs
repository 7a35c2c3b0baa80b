// ledger/src/error.rs
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Underlying read, write or delete failed.
    Storage(String),
    /// MVCC read/write conflict on a key. Retryable by the caller.
    WriteConflict(String),
    /// Rich query rejected or failed to execute.
    Query(String),
    /// Caller identity could not be resolved.
    Identity(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(msg) => write!(f, "Storage error: {}", msg),
            Self::WriteConflict(key) => write!(f, "Write conflict on key: {}", key),
            Self::Query(msg) => write!(f, "Query error: {}", msg),
            Self::Identity(msg) => write!(f, "Identity error: {}", msg),
        }
    }
}

impl std::error::Error for LedgerError {}
