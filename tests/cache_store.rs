use meme_bubbles_wasm::application::CacheStore;
use meme_bubbles_wasm::domain::logging::TimeProvider;
use meme_bubbles_wasm::domain::market_data::SnapshotStorage;
use meme_bubbles_wasm::infrastructure::InMemoryStorage;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

const KEY: &str = "memeBubbleData";
const TTL: u64 = 300_000;

struct ManualClock(AtomicU64);

impl ManualClock {
    fn at(ms: u64) -> Arc<Self> {
        Arc::new(Self(AtomicU64::new(ms)))
    }

    fn advance(&self, ms: u64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl TimeProvider for ManualClock {
    fn current_timestamp(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        timestamp.to_string()
    }
}

#[test]
fn saved_snapshot_reads_back_within_ttl() {
    let clock = ManualClock::at(1_000);
    let mut cache = CacheStore::new(InMemoryStorage::new(), clock.clone(), KEY, TTL);
    let data = json!([{ "id": "dogecoin" }]);

    cache.save(&data);
    clock.advance(TTL - 1);

    assert_eq!(cache.load(), Some(data.clone()));
    assert_eq!(cache.mirror(), Some(&data));
}

#[test]
fn stored_entry_uses_data_timestamp_layout() {
    let clock = ManualClock::at(42);
    let mut cache = CacheStore::new(InMemoryStorage::new(), clock, KEY, TTL);
    cache.save(&json!([1, 2]));

    let raw = cache.storage().read(KEY).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored, json!({ "data": [1, 2], "timestamp": 42 }));
}

#[test]
fn entry_expires_at_ttl() {
    let clock = ManualClock::at(0);
    let mut cache = CacheStore::new(InMemoryStorage::new(), clock.clone(), KEY, TTL);
    cache.save(&json!([]));

    clock.advance(TTL);
    assert_eq!(cache.load(), None);
}

#[test]
fn malformed_content_reads_as_absent() {
    for junk in ["not json", "{\"data\": []}", "null", "{\"timestamp\": \"soon\", \"data\": 1}"] {
        let storage = InMemoryStorage::new().with_item(KEY, junk);
        let mut cache = CacheStore::new(storage, ManualClock::at(0), KEY, TTL);
        assert_eq!(cache.load(), None, "{junk}");
    }
}

#[test]
fn failed_write_still_updates_mirror() {
    let mut cache = CacheStore::new(InMemoryStorage::read_only(), ManualClock::at(0), KEY, TTL);
    let data = json!([{ "id": "pepe" }]);

    cache.save(&data);

    assert_eq!(cache.mirror(), Some(&data));
    assert_eq!(cache.load(), None);
}

#[test]
fn clear_drops_storage_and_mirror() {
    let mut cache = CacheStore::new(InMemoryStorage::new(), ManualClock::at(0), KEY, TTL);
    cache.save(&json!([]));
    cache.clear();
    assert!(cache.storage().is_empty());
    assert!(cache.mirror().is_none());
}
