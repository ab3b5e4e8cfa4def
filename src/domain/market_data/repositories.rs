use crate::domain::errors::FetchError;
use serde_json::Value;
use std::future::Future;

/// Source of the raw markets payload
pub trait MarketDataSource {
    /// Fetch the current page of coins as untyped JSON.
    fn fetch_markets(&self) -> impl Future<Output = Result<Value, FetchError>>;
}

/// String key/value storage backing the snapshot cache
pub trait SnapshotStorage {
    fn read(&self, key: &str) -> Option<String>;

    fn write(&self, key: &str, value: &str) -> Result<(), String>;

    fn remove(&self, key: &str);
}
