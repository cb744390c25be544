use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::store::{KeyValueStore, StoreError, StoreMap};

/// Persistent store backed by a single JSON object file.
///
/// The whole map is cached in memory and rewritten on every mutation.
/// Writes go to a sibling temp file first and are moved into place with `rename`,
/// so a crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<StoreMap>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file is treated as an empty store; the file is only created on first write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = read_map(&path).await?;
        debug!(path = %path.display(), keys = entries.len(), "json store opened");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &StoreMap) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let body = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        trace!(path = %self.path.display(), keys = entries.len(), "json store flushed");
        Ok(())
    }
}

async fn read_map(path: &Path) -> Result<StoreMap, StoreError> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(StoreMap::new()),
        Err(e) => return Err(StoreError::Io(e)),
    };
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(StoreMap::new());
    }
    match serde_json::from_slice::<Value>(&raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::Corrupt(format!(
            "{}: expected a JSON object, found {}",
            path.display(),
            json_kind(&other)
        ))),
        Err(e) => Err(StoreError::Corrupt(format!("{}: {e}", path.display()))),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, keys: &[&str]) -> Result<StoreMap, StoreError> {
        let entries = self.entries.lock().await;
        Ok(keys
            .iter()
            .filter_map(|k| entries.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, batch: StoreMap) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        next.extend(batch);
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        if !keys.iter().any(|k| entries.contains_key(*k)) {
            return Ok(());
        }
        let mut next = entries.clone();
        for k in keys {
            next.remove(*k);
        }
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::{get_one, set_one};

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("state.json")).await.unwrap();
        assert!(store.get(&["anything"]).await.unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        set_one(&store, "apiCallCount", 7).await.unwrap();
        set_one(&store, "lastApiStatus", "success").await.unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(
            get_one(&reopened, "apiCallCount").await.unwrap(),
            Some(json!(7))
        );
        assert_eq!(
            get_one(&reopened, "lastApiStatus").await.unwrap(),
            Some(json!("success"))
        );
    }

    #[tokio::test]
    async fn remove_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        set_one(&store, "a", true).await.unwrap();
        store.remove(&["a"]).await.unwrap();

        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert!(get_one(&reopened, "a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        tokio::fs::write(&path, b"[1, 2, 3]").await.unwrap();

        let err = JsonFileStore::open(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)), "got {err:?}");

        tokio::fs::write(&path, b"{not json").await.unwrap();
        let err = JsonFileStore::open(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)), "got {err:?}");
    }
}
