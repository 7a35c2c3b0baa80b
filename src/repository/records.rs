use std::marker::PhantomData;
use std::time::Instant;

use async_trait::async_trait;
use ledger::TransactionContext;
use metrics::histogram;
use tracing::debug;

use super::{Repository, cursor::ScopedCursor};
use crate::{error::Error, query::Selector, record::Record};

/// Deterministic byte encoding of a record.
pub fn encode_record<T: Record>(item: &T) -> Result<Vec<u8>, Error> {
    serde_json::to_vec(item).map_err(|e| Error::Serialize(e.to_string()))
}

pub fn decode_record<T: Record>(bytes: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(bytes).map_err(|e| Error::Deserialize(e.to_string()))
}

/// [`Repository`] backed directly by the invocation's world state.
pub struct LedgerRepository<T: Record> {
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> LedgerRepository<T> {
    pub fn new() -> Self {
        Self {
            _record: PhantomData,
        }
    }
}

impl<T: Record> Default for LedgerRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> Repository<T> for LedgerRepository<T> {
    async fn set(&self, ctx: &TransactionContext, item: &T) -> Result<(), Error> {
        let bytes = encode_record(item)?;
        ctx.stub().put_state(item.key(), bytes).await?;
        Ok(())
    }

    async fn get(&self, ctx: &TransactionContext, id: &str) -> Result<T, Error> {
        let bytes = ctx
            .stub()
            .get_state(id)
            .await
            .map_err(|e| match Error::from(e) {
                Error::Storage(msg) => {
                    Error::Storage(format!("failed to read from world state: {}", msg))
                }
                other => other,
            })?;

        match bytes {
            Some(bytes) => decode_record(&bytes),
            None => Err(Error::NotFound(id.to_string())),
        }
    }

    async fn delete(&self, ctx: &TransactionContext, id: &str) -> Result<(), Error> {
        let stub = ctx.stub();
        let present = stub
            .get_state(id)
            .await
            .map_err(|e| match Error::from(e) {
                Error::Storage(msg) => {
                    Error::Storage(format!("failed to read from world state: {}", msg))
                }
                other => other,
            })?;
        if present.is_none() {
            return Err(Error::NotFound(id.to_string()));
        }

        stub.del_state(id).await.map_err(|e| match Error::from(e) {
            Error::Storage(msg) => {
                Error::Storage(format!("failed to delete from world state: {}", msg))
            }
            other => other,
        })
    }

    async fn filter(
        &self,
        ctx: &TransactionContext,
        selector: &Selector,
    ) -> Result<Vec<T>, Error> {
        let query = selector.to_query()?;
        self.list(ctx, &query).await
    }

    async fn list(&self, ctx: &TransactionContext, query: &str) -> Result<Vec<T>, Error> {
        let start = Instant::now();
        let iterator = ctx.stub().get_query_result(query).await?;
        let mut cursor = ScopedCursor::new(iterator);

        let mut items = Vec::new();
        while cursor.has_next() {
            let entry = cursor.next()?;
            items.push(decode_record::<T>(&entry.value)?);
        }
        cursor.close()?;

        histogram!("custodia.query.duration_ms",
            "type" => T::TYPE
        )
        .record(start.elapsed().as_millis() as f64);
        debug!(record_type = T::TYPE, count = items.len(), "listed records");

        Ok(items)
    }
}
