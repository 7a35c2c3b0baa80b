mod cursor;
pub mod records;

pub use records::*;

use async_trait::async_trait;
use ledger::TransactionContext;

use crate::{error::Error, query::Selector, record::Record};

/// -----------------------------
/// Record store contract
/// -----------------------------
///
/// Every call takes the invocation's [`TransactionContext`] explicitly; a
/// repository holds no per-invocation state.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// Encode `item` and write it under its key.
    async fn set(&self, ctx: &TransactionContext, item: &T) -> Result<(), Error>;

    /// `Error::NotFound` when the key is absent.
    async fn get(&self, ctx: &TransactionContext, id: &str) -> Result<T, Error>;

    async fn delete(&self, ctx: &TransactionContext, id: &str) -> Result<(), Error>;

    /// Equality conjunction over `selector`, delegated to [`Repository::list`].
    async fn filter(&self, ctx: &TransactionContext, selector: &Selector)
    -> Result<Vec<T>, Error>;

    /// Run a raw rich query and decode every result, in cursor order. Any
    /// failure mid-iteration discards what was read so far.
    async fn list(&self, ctx: &TransactionContext, query: &str) -> Result<Vec<T>, Error>;
}
