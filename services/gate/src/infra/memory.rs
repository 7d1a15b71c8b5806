//! In-process [`CodeStore`] with optimistic concurrency control.
//!
//! Every key a transaction touches has its version pinned on first access.
//! Commit fails with [`GateError::Conflict`] if any pinned key changed since,
//! so two transactions racing on one key serialize: exactly one commits.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::domain::repository::{CodeStore, CodeTxn, TxnFuture};
use crate::domain::types::AccessCode;
use crate::error::GateError;

#[derive(Debug, Clone)]
struct Entry {
    code: AccessCode,
    version: u64,
}

#[derive(Debug, Default)]
struct Records {
    entries: HashMap<String, Entry>,
    next_version: u64,
}

impl Records {
    fn version_of(&self, id: &str) -> Option<u64> {
        self.entries.get(id).map(|e| e.version)
    }

    fn apply(&mut self, id: String, write: Option<AccessCode>) {
        match write {
            Some(code) => {
                self.next_version += 1;
                let version = self.next_version;
                self.entries.insert(id, Entry { code, version });
            }
            None => {
                self.entries.remove(&id);
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryCodeStore {
    records: Arc<Mutex<Records>>,
}

impl MemoryCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Records> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Staged reads and writes of one [`MemoryCodeStore::transact`] call.
#[derive(Debug)]
pub struct MemoryTxn {
    store: MemoryCodeStore,
    pinned: HashMap<String, Option<u64>>,
    staged: HashMap<String, Option<AccessCode>>,
}

impl MemoryTxn {
    fn new(store: MemoryCodeStore) -> Self {
        Self {
            store,
            pinned: HashMap::new(),
            staged: HashMap::new(),
        }
    }

    /// Pin the current version of `id`, or fail if it moved since pinned.
    fn pin(&mut self, records: &Records, id: &str) -> Result<(), GateError> {
        let current = records.version_of(id);
        match self.pinned.get(id) {
            Some(pinned) if *pinned != current => Err(GateError::Conflict),
            Some(_) => Ok(()),
            None => {
                self.pinned.insert(id.to_owned(), current);
                Ok(())
            }
        }
    }

    fn commit(self) -> Result<(), GateError> {
        let mut records = self.store.lock();
        let moved = self
            .pinned
            .iter()
            .any(|(id, version)| records.version_of(id) != *version);
        if moved {
            return Err(GateError::Conflict);
        }
        for (id, write) in self.staged {
            records.apply(id, write);
        }
        Ok(())
    }
}

impl CodeTxn for MemoryTxn {
    async fn get(&mut self, id: &str) -> Result<Option<AccessCode>, GateError> {
        if let Some(staged) = self.staged.get(id) {
            return Ok(staged.clone());
        }
        let store = self.store.clone();
        let records = store.lock();
        self.pin(&records, id)?;
        Ok(records.entries.get(id).map(|e| e.code.clone()))
    }

    async fn put(&mut self, code: &AccessCode) -> Result<(), GateError> {
        let store = self.store.clone();
        self.pin(&store.lock(), &code.id)?;
        self.staged.insert(code.id.clone(), Some(code.clone()));
        Ok(())
    }

    async fn delete(&mut self, id: &str) -> Result<(), GateError> {
        let store = self.store.clone();
        self.pin(&store.lock(), id)?;
        self.staged.insert(id.to_owned(), None);
        Ok(())
    }
}

impl CodeStore for MemoryCodeStore {
    type Txn = MemoryTxn;

    async fn get(&self, id: &str) -> Result<Option<AccessCode>, GateError> {
        Ok(self.lock().entries.get(id).map(|e| e.code.clone()))
    }

    async fn put(&self, code: &AccessCode) -> Result<(), GateError> {
        self.lock().apply(code.id.clone(), Some(code.clone()));
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), GateError> {
        self.lock().apply(id.to_owned(), None);
        Ok(())
    }

    async fn transact<T, F>(&self, f: F) -> Result<T, GateError>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut Self::Txn) -> TxnFuture<'c, T> + Send,
    {
        let mut txn = MemoryTxn::new(self.clone());
        // An early return drops the staged writes: that is the rollback.
        let value = f(&mut txn).await?;
        txn.commit()?;
        Ok(value)
    }

    async fn stale_unused(&self, cutoff: DateTime<Utc>) -> Result<Vec<String>, GateError> {
        let records = self.lock();
        let mut ids: Vec<String> = records
            .entries
            .values()
            .filter(|e| !e.code.used && e.code.created_at < cutoff)
            .map(|e| e.code.id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn ping(&self) -> Result<(), GateError> {
        Ok(())
    }
}
