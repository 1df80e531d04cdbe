//! Process-local Patient store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{BuildError, StoreError};
use crate::resource::Resource;

/// Keyed store of Patient records.
///
/// Owns id assignment: a counter starting at 1 that only moves forward, so
/// ids are never reused within the lifetime of a store, even after deletes.
/// Every operation takes the lock once, so a mutation is either fully applied
/// or not applied at all.
#[derive(Debug)]
pub struct PatientStore {
    inner: RwLock<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    /// Records keyed by id; ordered so listings come out ascending
    records: BTreeMap<u64, Resource>,
    /// Next id to hand out
    next_id: u64,
}

impl PatientStore {
    /// Creates an empty store whose first id will be 1.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                records: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Inserts a new record under the next free id.
    ///
    /// `build` receives the id and produces the record to store. Ids already
    /// taken by [`PatientStore::put`] are skipped. The counter only advances
    /// when `build` succeeds.
    ///
    /// # Returns
    /// The assigned id and a copy of the stored record.
    pub fn create<F>(&self, build: F) -> Result<(u64, Resource), StoreError>
    where
        F: FnOnce(u64) -> Result<Resource, BuildError>,
    {
        let mut inner = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        let id = inner.first_free_id()?;
        let following = id.checked_add(1).ok_or(StoreError::IdSpaceExhausted)?;

        let record = build(id)?;
        inner.next_id = following;
        inner.records.insert(id, record.clone());
        tracing::debug!(id, "patient stored");
        Ok((id, record))
    }

    /// Returns a copy of the record stored under `id`.
    pub fn get(&self, id: u64) -> Result<Option<Resource>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(inner.records.get(&id).cloned())
    }

    /// Stores `record` under `id`, replacing any existing record.
    ///
    /// Inserting under an id that was never handed out does not move the
    /// counter.
    pub fn put(&self, id: u64, record: Resource) -> Result<Resource, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        if inner.records.insert(id, record.clone()).is_none() {
            tracing::debug!(id, "patient inserted by replacement");
        }
        Ok(record)
    }

    /// Removes the record stored under `id`.
    ///
    /// # Returns
    /// Whether a record existed.
    pub fn delete(&self, id: u64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(inner.records.remove(&id).is_some())
    }

    /// Returns every stored id in ascending order.
    pub fn list_ids(&self) -> Result<Vec<u64>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(inner.records.keys().copied().collect())
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<usize, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(inner.records.len())
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// The id the next successful create will receive.
    pub fn next_id(&self) -> Result<u64, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        inner.first_free_id()
    }
}

impl StoreInner {
    /// First id at or after the counter with no record stored under it.
    fn first_free_id(&self) -> Result<u64, StoreError> {
        let mut id = self.next_id;
        while self.records.contains_key(&id) {
            id = id.checked_add(1).ok_or(StoreError::IdSpaceExhausted)?;
        }
        Ok(id)
    }
}

impl Default for PatientStore {
    fn default() -> Self {
        Self::new()
    }
}
