use ledger::{KeyValue, StateIterator};
use tracing::warn;

use crate::error::Error;

/// Owns a ledger query cursor for the duration of one read.
///
/// The cursor is closed exactly once: by [`ScopedCursor::close`] on the happy
/// path, or on drop when an early return or `?` abandons it.
pub(crate) struct ScopedCursor {
    inner: Option<Box<dyn StateIterator>>,
}

impl ScopedCursor {
    pub(crate) fn new(inner: Box<dyn StateIterator>) -> Self {
        Self { inner: Some(inner) }
    }

    pub(crate) fn has_next(&self) -> bool {
        self.inner.as_ref().is_some_and(|it| it.has_next())
    }

    pub(crate) fn next(&mut self) -> Result<KeyValue, Error> {
        match self.inner.as_mut() {
            Some(it) => it.next().map_err(Error::from),
            None => Err(Error::Storage("cursor already closed".to_string())),
        }
    }

    pub(crate) fn close(mut self) -> Result<(), Error> {
        match self.inner.take() {
            Some(mut it) => it.close().map_err(Error::from),
            None => Ok(()),
        }
    }
}

impl Drop for ScopedCursor {
    fn drop(&mut self) {
        if let Some(mut it) = self.inner.take() {
            if let Err(err) = it.close() {
                warn!(error = %err, "failed to close abandoned query cursor");
            }
        }
    }
}
