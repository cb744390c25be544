//! API credential storage.
//!
//! The secret is obfuscated with [`codec`] and written either to the persistent store or to a
//! process-lifetime session store, depending on the retention class requested by the user.
//! The retention flag itself always lives in the persistent store, so after a restart a
//! session-only key reads as absent.
//!
//! The plain methods fail soft: they log and return `None`/`false`, because a missing
//! credential is an expected condition that sends the user to onboarding. The `try_*`
//! variants expose the typed error.
mod codec;
pub use codec::{decode, encode};

mod error;
pub use error::CredentialError;

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use hng_model::{StorageClass, keys};

use crate::store::{KeyValueStore, MemoryStore, StoreHandle, StoreMap, get_one};

/// Stores and retrieves the remote API credential.
#[derive(Clone)]
pub struct CredentialStore {
    persistent: StoreHandle,
    session: StoreHandle,
}

impl CredentialStore {
    /// Create a credential store over explicit persistent and session areas.
    pub fn new(persistent: StoreHandle, session: StoreHandle) -> Self {
        Self {
            persistent,
            session,
        }
    }

    /// Create a credential store whose session area is a fresh [`MemoryStore`].
    pub fn with_memory_session(persistent: StoreHandle) -> Self {
        Self::new(persistent, Arc::new(MemoryStore::new()))
    }

    /// Encode and save `secret`. Returns `false` on any failure.
    pub async fn store(&self, secret: &str, session_only: bool) -> bool {
        match self.try_store(secret, session_only).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to store credential");
                false
            }
        }
    }

    /// Return the decoded secret, or `None` if absent or unreadable.
    pub async fn retrieve(&self) -> Option<String> {
        match self.try_retrieve().await {
            Ok(secret) => secret,
            Err(e) => {
                warn!(error = %e, "failed to retrieve credential");
                None
            }
        }
    }

    /// Whether a credential is present; does not decode it.
    pub async fn exists(&self) -> bool {
        match self.try_exists().await {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "failed to check credential presence");
                false
            }
        }
    }

    /// Remove the secret and its retention flag. Returns `false` on failure.
    pub async fn clear(&self) -> bool {
        match self.try_clear().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to clear credential");
                false
            }
        }
    }

    /// Retention class recorded for the credential, `None` only when storage fails.
    pub async fn storage_class(&self) -> Option<StorageClass> {
        match self.try_storage_class().await {
            Ok(class) => Some(class),
            Err(e) => {
                warn!(error = %e, "failed to read credential storage class");
                None
            }
        }
    }

    #[instrument(level = "debug", skip_all, fields(session_only))]
    pub async fn try_store(&self, secret: &str, session_only: bool) -> Result<(), CredentialError> {
        let encoded = encode(secret)?;

        if session_only {
            self.session
                .set(entries([(keys::API_KEY, Value::String(encoded))]))
                .await?;
            // Dropping the persistent copy and raising the flag is one write; a failure
            // leaves the previous credential in effect.
            self.persistent
                .set(entries([
                    (keys::API_KEY, Value::Null),
                    (keys::API_KEY_IN_SESSION, Value::Bool(true)),
                ]))
                .await?;
        } else {
            self.persistent
                .set(entries([
                    (keys::API_KEY, Value::String(encoded)),
                    (keys::API_KEY_IN_SESSION, Value::Bool(false)),
                ]))
                .await?;
            self.session.remove(&[keys::API_KEY]).await?;
        }
        debug!(class = %StorageClass::from_session_flag(session_only), "credential stored");
        Ok(())
    }

    pub async fn try_retrieve(&self) -> Result<Option<String>, CredentialError> {
        match self.read_encoded().await? {
            Some(encoded) => decode(&encoded).map(Some),
            None => Ok(None),
        }
    }

    pub async fn try_exists(&self) -> Result<bool, CredentialError> {
        Ok(self.read_encoded().await?.is_some())
    }

    pub async fn try_clear(&self) -> Result<(), CredentialError> {
        self.persistent
            .remove(&[keys::API_KEY, keys::API_KEY_IN_SESSION])
            .await?;
        self.session.remove(&[keys::API_KEY]).await?;
        debug!("credential cleared");
        Ok(())
    }

    pub async fn try_storage_class(&self) -> Result<StorageClass, CredentialError> {
        Ok(StorageClass::from_session_flag(self.session_flag().await?))
    }

    async fn session_flag(&self) -> Result<bool, CredentialError> {
        let flag = get_one(self.persistent.as_ref(), keys::API_KEY_IN_SESSION).await?;
        Ok(matches!(flag, Some(Value::Bool(true))))
    }

    async fn read_encoded(&self) -> Result<Option<String>, CredentialError> {
        let area = if self.session_flag().await? {
            &self.session
        } else {
            &self.persistent
        };
        match get_one(area.as_ref(), keys::API_KEY).await? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(CredentialError::Decode(format!(
                "expected a string, found {other}"
            ))),
        }
    }
}

fn entries<const N: usize>(pairs: [(&str, Value); N]) -> StoreMap {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::store::set_one;

    fn stores() -> (Arc<MemoryStore>, Arc<MemoryStore>, CredentialStore) {
        let persistent = Arc::new(MemoryStore::new());
        let session = Arc::new(MemoryStore::new());
        let creds = CredentialStore::new(persistent.clone(), session.clone());
        (persistent, session, creds)
    }

    #[tokio::test]
    async fn store_retrieve_clear_round_trip() {
        let (_, _, creds) = stores();

        assert!(creds.store("secret123", false).await);
        assert_eq!(creds.retrieve().await.as_deref(), Some("secret123"));
        assert!(creds.exists().await);

        assert!(creds.clear().await);
        assert_eq!(creds.retrieve().await, None);
        assert!(!creds.exists().await);
    }

    #[tokio::test]
    async fn persistent_mode_writes_obfuscated_value() {
        let (persistent, session, creds) = stores();
        assert!(creds.store("secret123", false).await);

        let stored = persistent
            .get(&[keys::API_KEY, keys::API_KEY_IN_SESSION])
            .await
            .unwrap();
        assert_eq!(stored.get(keys::API_KEY), Some(&json!("c2VjcmV0MTIz")));
        assert_eq!(stored.get(keys::API_KEY_IN_SESSION), Some(&json!(false)));
        assert!(session.is_empty());
        assert_eq!(creds.storage_class().await, Some(StorageClass::Persistent));
    }

    #[tokio::test]
    async fn session_mode_keeps_secret_out_of_persistent_store() {
        let (persistent, session, creds) = stores();
        assert!(creds.store("old-key", false).await);
        assert!(creds.store("session-key", true).await);

        assert_eq!(
            get_one(persistent.as_ref(), keys::API_KEY).await.unwrap(),
            Some(Value::Null)
        );
        assert_eq!(session.len(), 1);
        assert_eq!(creds.retrieve().await.as_deref(), Some("session-key"));
        assert_eq!(creds.storage_class().await, Some(StorageClass::Session));
    }

    /// Persistent area that records the keys of every write.
    #[derive(Default)]
    struct RecordingStore {
        inner: MemoryStore,
        writes: std::sync::Mutex<Vec<Vec<String>>>,
    }

    #[async_trait::async_trait]
    impl KeyValueStore for RecordingStore {
        async fn get(&self, keys: &[&str]) -> Result<StoreMap, crate::store::StoreError> {
            self.inner.get(keys).await
        }

        async fn set(&self, entries: StoreMap) -> Result<(), crate::store::StoreError> {
            let mut written: Vec<String> = entries.keys().cloned().collect();
            written.sort();
            self.writes.lock().unwrap().push(written);
            self.inner.set(entries).await
        }

        async fn remove(&self, keys: &[&str]) -> Result<(), crate::store::StoreError> {
            self.inner.remove(keys).await
        }
    }

    #[tokio::test]
    async fn session_mode_updates_persistent_area_in_one_write() {
        let persistent = Arc::new(RecordingStore::default());
        let creds = CredentialStore::with_memory_session(persistent.clone());
        assert!(creds.store("old-key", false).await);
        persistent.writes.lock().unwrap().clear();

        assert!(creds.store("session-key", true).await);

        let mut expected = vec![keys::API_KEY.to_string(), keys::API_KEY_IN_SESSION.to_string()];
        expected.sort();
        assert_eq!(*persistent.writes.lock().unwrap(), vec![expected]);
        assert!(creds.exists().await);
        assert_eq!(creds.retrieve().await.as_deref(), Some("session-key"));

        assert!(creds.clear().await);
        assert!(persistent.inner.is_empty());
    }

    #[tokio::test]
    async fn session_key_is_gone_after_restart() {
        let persistent = Arc::new(MemoryStore::new());
        let creds = CredentialStore::with_memory_session(persistent.clone());
        assert!(creds.store("session-key", true).await);

        let restarted = CredentialStore::with_memory_session(persistent);
        assert!(!restarted.exists().await);
        assert_eq!(restarted.retrieve().await, None);
        assert_eq!(restarted.storage_class().await, Some(StorageClass::Session));
    }

    #[tokio::test]
    async fn switching_back_to_persistent_drops_session_copy() {
        let (_, session, creds) = stores();
        assert!(creds.store("a", true).await);
        assert!(creds.store("b", false).await);

        assert!(session.is_empty());
        assert_eq!(creds.retrieve().await.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn unencodable_secret_is_rejected() {
        let (_, _, creds) = stores();
        assert!(!creds.store("कुंजी", false).await);
        assert!(!creds.store("", false).await);
        assert!(!creds.exists().await);
    }

    #[tokio::test]
    async fn corrupt_value_reads_as_missing() {
        let (persistent, _, creds) = stores();
        set_one(persistent.as_ref(), keys::API_KEY, "not base64!").await.unwrap();

        assert!(creds.exists().await);
        assert_eq!(creds.retrieve().await, None);
        assert!(matches!(
            creds.try_retrieve().await,
            Err(CredentialError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn missing_flag_reports_persistent() {
        let (_, _, creds) = stores();
        assert_eq!(creds.storage_class().await, Some(StorageClass::Persistent));
    }
}
