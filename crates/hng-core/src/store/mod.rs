//! Key-value storage port used for counters, settings and credentials.
//!
//! The shape mirrors a browser extension storage area: batched `get`/`set`/`remove` over JSON values.
//! Missing keys are simply absent from the returned map.
mod error;
pub use error::StoreError;

mod file;
pub use file::JsonFileStore;

mod memory;
pub use memory::MemoryStore;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

/// Batch of entries read from or written to a store.
pub type StoreMap = serde_json::Map<String, Value>;

/// Asynchronous key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Read the given keys; absent keys are omitted from the result.
    async fn get(&self, keys: &[&str]) -> Result<StoreMap, StoreError>;

    /// Insert or overwrite all entries as one unit.
    async fn set(&self, entries: StoreMap) -> Result<(), StoreError>;

    /// Remove the given keys; unknown keys are ignored.
    async fn remove(&self, keys: &[&str]) -> Result<(), StoreError>;
}

/// Shared handle to a store implementation.
pub type StoreHandle = Arc<dyn KeyValueStore>;

/// Read a single key.
pub async fn get_one(store: &dyn KeyValueStore, key: &str) -> Result<Option<Value>, StoreError> {
    let mut map = store.get(&[key]).await?;
    Ok(map.remove(key))
}

/// Write a single key.
pub async fn set_one(
    store: &dyn KeyValueStore,
    key: &str,
    value: impl Into<Value>,
) -> Result<(), StoreError> {
    let mut map = StoreMap::new();
    map.insert(key.to_string(), value.into());
    store.set(map).await
}
