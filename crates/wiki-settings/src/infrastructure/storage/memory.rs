//! In-memory settings store.
//!
//! Records are kept in a `Mutex<HashMap<..>>` so the store can be shared by
//! reference between a [`SettingsService`](crate::application::manage_settings::SettingsService)
//! and the test that inspects what it wrote.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use uuid::Uuid;

use crate::application::manage_settings::{SettingsStore, StoreError};

#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    records: Mutex<HashMap<Uuid, String>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `json` under `id`.
    pub fn with_record(id: Uuid, json: impl Into<String>) -> Self {
        let store = Self::new();
        store
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, json.into());
        store
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn fetch(&self, id: Uuid) -> Result<Option<String>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(&id).cloned())
    }

    fn store(&self, id: Uuid, json: &str) -> Result<(), StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        records.insert(id, json.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_starts_empty() {
        let store = InMemorySettingsStore::new();
        assert!(store.is_empty());
        assert_eq!(store.fetch(Uuid::new_v4()).unwrap(), None);
    }

    #[test]
    fn test_store_then_fetch_returns_text() {
        let store = InMemorySettingsStore::new();
        let id = Uuid::new_v4();

        store.store(id, "{}").unwrap();

        assert_eq!(store.fetch(id).unwrap().as_deref(), Some("{}"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_with_record_seeds_store() {
        let id = Uuid::new_v4();
        let store = InMemorySettingsStore::with_record(id, "seed");

        assert_eq!(store.fetch(id).unwrap().as_deref(), Some("seed"));
    }

    #[test]
    fn test_len_still_counts_records_after_lock_is_poisoned() {
        // Arrange: a thread panics while holding the lock
        let store = InMemorySettingsStore::with_record(Uuid::new_v4(), "seed");
        std::thread::scope(|s| {
            let result = s
                .spawn(|| {
                    let _guard = store.records.lock().unwrap();
                    panic!("panic while holding the records lock");
                })
                .join();
            assert!(result.is_err());
        });

        // Act / Assert
        assert!(store.records.is_poisoned());
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
        assert!(matches!(
            store.fetch(Uuid::new_v4()),
            Err(StoreError::Poisoned)
        ));
    }
}
