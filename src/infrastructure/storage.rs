use crate::domain::{
    logging::LogComponent,
    market_data::SnapshotStorage,
};
use crate::log_warn;
use std::cell::RefCell;
use std::collections::HashMap;

/// `window.localStorage`, resolved on every access so that a storage disabled
/// by the browser just reads as empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageBackend;

impl LocalStorageBackend {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl SnapshotStorage for LocalStorageBackend {
    fn read(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), String> {
        let storage = Self::storage().ok_or_else(|| "localStorage is not available".to_string())?;
        storage
            .set_item(key, value)
            .map_err(|e| format!("setItem failed: {:?}", e))
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            if let Err(e) = storage.remove_item(key) {
                log_warn!(LogComponent::Infrastructure("Storage"), "removeItem failed: {:?}", e);
            }
        }
    }
}

/// Map-backed storage, usable off the browser
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    items: RefCell<HashMap<String, String>>,
    read_only: bool,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose writes always fail, like a full quota.
    pub fn read_only() -> Self {
        Self { read_only: true, ..Self::default() }
    }

    pub fn with_item(self, key: &str, value: &str) -> Self {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SnapshotStorage for InMemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), String> {
        if self.read_only {
            return Err("QuotaExceededError".to_string());
        }
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_storage_rejects_writes() {
        let storage = InMemoryStorage::read_only();
        assert!(storage.write("k", "v").is_err());
        assert!(storage.read("k").is_none());
    }

    #[test]
    fn remove_deletes_the_key() {
        let storage = InMemoryStorage::new().with_item("k", "v");
        assert_eq!(storage.read("k").as_deref(), Some("v"));
        storage.remove("k");
        assert!(storage.is_empty());
    }
}
