//! In-memory record store with per-record locking.
//!
//! The outer `RwLock` guards the id-to-record map and is held only to find,
//! insert or remove entries. Each record sits behind its own `Mutex`, held
//! across check-then-mutate. Locks are always taken outer first, then
//! record.
//!
//! A poisoned lock is recovered rather than propagated: every mutation
//! leaves the record consistent between statements.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A shared handle to one record.
pub(crate) type Record<V> = Arc<Mutex<V>>;

/// Locks a record mutex, recovering from poisoning.
pub(crate) fn lock<V>(record: &Mutex<V>) -> MutexGuard<'_, V> {
    record.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) struct Store<K, V> {
    records: RwLock<HashMap<K, Record<V>>>,
}

impl<K, V> Default for Store<K, V> {
    fn default() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Store<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, HashMap<K, Record<V>>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, HashMap<K, Record<V>>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts or replaces a record.
    pub(crate) fn insert(&self, key: K, value: V) {
        self.write().insert(key, Arc::new(Mutex::new(value)));
    }

    /// Inserts a record only if the key is free. Returns false if taken.
    pub(crate) fn insert_new(&self, key: K, value: V) -> bool {
        let mut records = self.write();
        if records.contains_key(&key) {
            return false;
        }
        records.insert(key, Arc::new(Mutex::new(value)));
        true
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<Record<V>>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.read().get(key).cloned()
    }

    pub(crate) fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let record = self.write().remove(key)?;
        let value = lock(&record).clone();
        Some(value)
    }

    /// Removes a record if `check` accepts its current value.
    ///
    /// Returns `None` if the key is absent, otherwise the outcome of `check`
    /// with the removed value on success.
    pub(crate) fn remove_if<Q, E, F>(&self, key: &Q, check: F) -> Option<Result<V, E>>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
        F: FnOnce(&V) -> Result<(), E>,
    {
        let mut records = self.write();
        let record = records.get(key)?.clone();
        let value = lock(&record);
        if let Err(e) = check(&value) {
            return Some(Err(e));
        }
        let removed = value.clone();
        drop(value);
        records.remove(key);
        Some(Ok(removed))
    }

    /// Clones every record matching `filter`.
    pub(crate) fn snapshot<F>(&self, mut filter: F) -> Vec<V>
    where
        F: FnMut(&V) -> bool,
    {
        self.read()
            .values()
            .filter_map(|record| {
                let value = lock(record);
                filter(&value).then(|| value.clone())
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.read().len()
    }
}
