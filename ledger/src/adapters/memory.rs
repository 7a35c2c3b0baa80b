// ledger/src/adapters/memory.rs
use crate::{ClientIdentity, KeyValue, LedgerError, StateIterator, WorldState};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use super::selector::Selector;

#[derive(Default)]
struct Faults {
    fail_writes: bool,
    fail_deletes: bool,
    conflict_keys: BTreeSet<String>,
    fail_iteration_at: Option<usize>,
}

#[derive(Clone)]
struct MemoryStore {
    state: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
    faults: Arc<Mutex<Faults>>,
    open_cursors: Arc<AtomicUsize>,
}

impl MemoryStore {
    fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(BTreeMap::new())),
            faults: Arc::new(Mutex::new(Faults::default())),
            open_cursors: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, BTreeMap<String, Vec<u8>>>, LedgerError> {
        self.state
            .lock()
            .map_err(|_| LedgerError::Storage("world state lock poisoned".to_string()))
    }

    fn faults(&self) -> Result<MutexGuard<'_, Faults>, LedgerError> {
        self.faults
            .lock()
            .map_err(|_| LedgerError::Storage("fault table lock poisoned".to_string()))
    }

    fn check_write(&self, key: &str) -> Result<(), LedgerError> {
        let faults = self.faults()?;
        if faults.conflict_keys.contains(key) {
            debug!(key, "injected write conflict");
            return Err(LedgerError::WriteConflict(key.to_string()));
        }
        if faults.fail_writes {
            return Err(LedgerError::Storage(format!("put failed for key {}", key)));
        }
        Ok(())
    }
}

/// In-process world state for tests and embedding.
///
/// Keys iterate in byte order, like the platform's state database. Cursors
/// returned by [`WorldState::get_query_result`] are counted until closed.
pub struct MemoryLedger {
    store: MemoryStore,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
        }
    }

    /// Raw bytes stored under `key`, bypassing fault injection.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.store
            .state
            .lock()
            .ok()
            .and_then(|state| state.get(key).cloned())
    }

    /// Seed a value directly, bypassing fault injection.
    pub fn insert_raw(&self, key: &str, value: Vec<u8>) {
        if let Ok(mut state) = self.store.state.lock() {
            state.insert(key.to_string(), value);
        }
    }

    pub fn len(&self) -> usize {
        self.store.state.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cursors handed out and not yet closed.
    pub fn open_cursors(&self) -> usize {
        self.store.open_cursors.load(Ordering::SeqCst)
    }

    /// blake3 digest over every key/value pair in key order.
    pub fn state_digest(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        if let Ok(state) = self.store.state.lock() {
            for (key, value) in state.iter() {
                hasher.update(&(key.len() as u64).to_le_bytes());
                hasher.update(key.as_bytes());
                hasher.update(&(value.len() as u64).to_le_bytes());
                hasher.update(value);
            }
        }
        hasher.finalize().to_hex().to_string()
    }

    pub fn fail_writes(&self, fail: bool) {
        if let Ok(mut faults) = self.store.faults.lock() {
            faults.fail_writes = fail;
        }
    }

    pub fn fail_deletes(&self, fail: bool) {
        if let Ok(mut faults) = self.store.faults.lock() {
            faults.fail_deletes = fail;
        }
    }

    /// Report an MVCC conflict on every write to `key`.
    pub fn conflict_on(&self, key: &str) {
        if let Ok(mut faults) = self.store.faults.lock() {
            faults.conflict_keys.insert(key.to_string());
        }
    }

    /// Make the `index`-th `next()` of every subsequent cursor fail.
    pub fn fail_iteration_at(&self, index: Option<usize>) {
        if let Ok(mut faults) = self.store.faults.lock() {
            faults.fail_iteration_at = index;
        }
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorldState for MemoryLedger {
    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.store.state()?.get(key).cloned())
    }

    async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::Storage("key must not be empty".to_string()));
        }
        self.store.check_write(key)?;
        self.store.state()?.insert(key.to_string(), value);
        Ok(())
    }

    async fn del_state(&self, key: &str) -> Result<(), LedgerError> {
        if self.store.faults()?.fail_deletes {
            return Err(LedgerError::Storage(format!("delete failed for key {}", key)));
        }
        self.store.check_write(key)?;
        self.store.state()?.remove(key);
        Ok(())
    }

    async fn get_query_result(
        &self,
        query: &str,
    ) -> Result<Box<dyn StateIterator>, LedgerError> {
        let selector = Selector::parse(query)?;

        let entries: VecDeque<KeyValue> = self
            .store
            .state()?
            .iter()
            .filter(|(_, value)| selector.matches(value))
            .map(|(key, value)| KeyValue {
                key: key.clone(),
                value: value.clone(),
            })
            .collect();

        let fail_at = self.store.faults()?.fail_iteration_at;
        self.store.open_cursors.fetch_add(1, Ordering::SeqCst);
        debug!(query, matched = entries.len(), "opened query cursor");

        Ok(Box::new(MemoryIterator {
            entries,
            position: 0,
            fail_at,
            open_cursors: Arc::clone(&self.store.open_cursors),
            closed: false,
        }))
    }
}

struct MemoryIterator {
    entries: VecDeque<KeyValue>,
    position: usize,
    fail_at: Option<usize>,
    open_cursors: Arc<AtomicUsize>,
    closed: bool,
}

impl StateIterator for MemoryIterator {
    fn has_next(&self) -> bool {
        !self.closed && !self.entries.is_empty()
    }

    fn next(&mut self) -> Result<KeyValue, LedgerError> {
        if self.closed {
            return Err(LedgerError::Storage("cursor already closed".to_string()));
        }
        if self.fail_at == Some(self.position) {
            return Err(LedgerError::Storage(format!(
                "iteration failed at position {}",
                self.position
            )));
        }
        let entry = self
            .entries
            .pop_front()
            .ok_or_else(|| LedgerError::Storage("cursor exhausted".to_string()))?;
        self.position += 1;
        Ok(entry)
    }

    fn close(&mut self) -> Result<(), LedgerError> {
        if !self.closed {
            self.closed = true;
            self.open_cursors.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// Fixed caller identity, or one that fails to resolve.
pub struct MemoryIdentity {
    msp_id: Option<String>,
    common_name: Option<String>,
}

impl MemoryIdentity {
    pub fn new(msp_id: &str, common_name: &str) -> Self {
        Self {
            msp_id: Some(msp_id.to_string()),
            common_name: Some(common_name.to_string()),
        }
    }

    /// An identity whose certificate cannot be read.
    pub fn unresolvable() -> Self {
        Self {
            msp_id: None,
            common_name: None,
        }
    }
}

impl ClientIdentity for MemoryIdentity {
    fn msp_id(&self) -> Result<String, LedgerError> {
        self.msp_id
            .clone()
            .ok_or_else(|| LedgerError::Identity("no MSP id in creator".to_string()))
    }

    fn common_name(&self) -> Result<String, LedgerError> {
        self.common_name
            .clone()
            .ok_or_else(|| LedgerError::Identity("no X.509 certificate in creator".to_string()))
    }
}
