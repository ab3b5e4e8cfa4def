use crate::domain::{
    logging::{LogComponent, TimeProvider},
    market_data::{CacheEntry, SnapshotStorage},
};
use crate::{log_debug, log_warn};
use serde_json::Value;
use std::sync::Arc;

/// Last market snapshot, persisted under one key with a freshness window.
pub struct CacheStore<S: SnapshotStorage> {
    storage: S,
    clock: Arc<dyn TimeProvider>,
    key: String,
    ttl_ms: u64,
    mirror: Option<Value>,
}

impl<S: SnapshotStorage> CacheStore<S> {
    pub fn new(storage: S, clock: Arc<dyn TimeProvider>, key: impl Into<String>, ttl_ms: u64) -> Self {
        Self { storage, clock, key: key.into(), ttl_ms, mirror: None }
    }

    /// Persist `data` stamped with the current time. A failed write is only
    /// logged; the in-memory mirror is updated either way.
    pub fn save(&mut self, data: &Value) {
        let entry = CacheEntry::new(data.clone(), self.clock.current_timestamp());
        match serde_json::to_string(&entry) {
            Ok(serialized) => {
                if let Err(e) = self.storage.write(&self.key, &serialized) {
                    log_warn!(LogComponent::Application("CacheStore"), "Failed to persist snapshot: {}", e);
                }
            }
            Err(e) => {
                log_warn!(LogComponent::Application("CacheStore"), "Failed to serialize snapshot: {}", e);
            }
        }
        self.mirror = Some(data.clone());
    }

    /// Stored data if younger than the TTL. Missing, expired or malformed
    /// entries all read as absent.
    pub fn load(&mut self) -> Option<Value> {
        let raw = self.storage.read(&self.key)?;
        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                log_warn!(LogComponent::Application("CacheStore"), "Ignoring malformed snapshot: {}", e);
                return None;
            }
        };

        let now = self.clock.current_timestamp();
        if !entry.is_fresh(now, self.ttl_ms) {
            log_debug!(
                LogComponent::Application("CacheStore"),
                "Snapshot expired ({} ms old)",
                entry.age_ms(now)
            );
            return None;
        }

        self.mirror = Some(entry.data.clone());
        Some(entry.data)
    }

    /// Data of the last successful save or load.
    pub fn mirror(&self) -> Option<&Value> {
        self.mirror.as_ref()
    }

    pub fn clear(&mut self) {
        self.storage.remove(&self.key);
        self.mirror = None;
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
