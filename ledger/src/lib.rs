// ledger/src/lib.rs
//! The narrow seam between the custodia contract and the ledger platform.
//!
//! The platform hands every invocation a [`TransactionContext`]: a view of the
//! world state as of the transaction's read set, and the already
//! authenticated identity of whoever submitted it. Nothing here outlives a
//! single invocation.

pub mod adapters;
pub mod error;

pub use error::LedgerError;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One entry yielded by a query cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

/// Ledger-side result cursor for a rich query.
///
/// Every cursor holds resources on the peer until [`StateIterator::close`] is
/// called, so callers must close it on every exit path.
pub trait StateIterator: Send {
    fn has_next(&self) -> bool;
    fn next(&mut self) -> Result<KeyValue, LedgerError>;
    fn close(&mut self) -> Result<(), LedgerError>;
}

/// Key-value world state plus the selector query engine.
///
/// Reads observe the invocation's own writes. Conflicting writes across
/// invocations are detected by the platform at commit and reported as
/// [`LedgerError::WriteConflict`].
#[async_trait]
pub trait WorldState: Send + Sync {
    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;
    async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;
    async fn del_state(&self, key: &str) -> Result<(), LedgerError>;
    async fn get_query_result(&self, query: &str)
    -> Result<Box<dyn StateIterator>, LedgerError>;
}

/// Identity of the submitter, authenticated by the platform.
pub trait ClientIdentity: Send + Sync {
    /// Membership service provider (organization) of the caller.
    fn msp_id(&self) -> Result<String, LedgerError>;

    /// Subject common name of the caller's X.509 certificate.
    fn common_name(&self) -> Result<String, LedgerError>;
}

/// Per-invocation context. Cheap to clone.
#[derive(Clone)]
pub struct TransactionContext {
    stub: Arc<dyn WorldState>,
    identity: Arc<dyn ClientIdentity>,
}

impl TransactionContext {
    pub fn new(stub: Arc<dyn WorldState>, identity: Arc<dyn ClientIdentity>) -> Self {
        Self { stub, identity }
    }

    pub fn stub(&self) -> &dyn WorldState {
        self.stub.as_ref()
    }

    pub fn client_identity(&self) -> &dyn ClientIdentity {
        self.identity.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::WriteConflict("asset1".to_string());
        assert_eq!(err.to_string(), "Write conflict on key: asset1");
        assert_eq!(
            LedgerError::Query("bad".to_string()).to_string(),
            "Query error: bad"
        );
    }
}
