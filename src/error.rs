use std::fmt::Display;

use ledger::LedgerError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    NotFound(String),
    Conflict(String),
    AccessDenied(String),
    Identity(String),
    Serialize(String),
    Deserialize(String),
    Storage(String),
    WriteConflict(String),
    Query(String),
    InvalidArgument(String),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Serialization, deserialization and ledger I/O failures.
    pub fn is_store_error(&self) -> bool {
        matches!(
            self,
            Error::Serialize(_) | Error::Deserialize(_) | Error::Storage(_)
        )
    }

    /// The ledger rejected the write because of a concurrent update; the
    /// whole transaction may be resubmitted.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::WriteConflict(_))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NotFound(id) => write!(f, "The asset {} does not exist", id),
            Error::Conflict(id) => write!(f, "The asset {} already exists", id),
            Error::AccessDenied(msg) => write!(f, "Access denied: {}", msg),
            Error::Identity(err) => write!(f, "Identity error: {}", err),
            Error::Serialize(err) => write!(f, "Serialization error: {}", err),
            Error::Deserialize(err) => write!(f, "Deserialization error: {}", err),
            Error::Storage(err) => write!(f, "Storage error: {}", err),
            Error::WriteConflict(key) => write!(f, "Write conflict on key: {}", key),
            Error::Query(err) => write!(f, "Query error: {}", err),
            Error::InvalidArgument(err) => write!(f, "Invalid argument: {}", err),
        }
    }
}

impl std::error::Error for Error {}

impl From<LedgerError> for Error {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Storage(msg) => Error::Storage(msg),
            LedgerError::WriteConflict(key) => Error::WriteConflict(key),
            LedgerError::Query(msg) => Error::Query(msg),
            LedgerError::Identity(msg) => Error::Identity(msg),
        }
    }
}
