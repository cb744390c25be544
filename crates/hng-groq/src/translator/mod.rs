//! Translation service: credentials, settings, prompts and the throttled chat client in one place.
mod settings;

mod view;
pub use view::{ApiUsage, KeyStatus};

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use hng_core::{
    BatchCoordinator, CoreError, CredentialStore, DEFAULT_GROUP_SIZE, ProgressFn, RequestError,
    RequestHandle, RequestThrottler, StoreHandle, store::set_one,
};
use hng_model::{Progress, TranslationSettings, keys};

use crate::{
    client::ChatClient,
    prompt,
    text::{is_translatable_text, offline_translate, preprocess},
};

/// Message returned when no credential is configured.
pub const NOT_CONFIGURED: &str = "Please configure your API key first";

/// Translation service.
///
/// Every remote call goes through the shared [`RequestThrottler`]; the credential is resolved
/// before enqueueing, so a missing key never occupies the queue.
#[derive(Clone)]
pub struct Translator {
    client: ChatClient,
    throttler: RequestThrottler,
    batch: BatchCoordinator,
    credentials: CredentialStore,
    store: StoreHandle,
    group_size: usize,
}

impl Translator {
    /// `store` is the persistent store holding settings and the onboarding marker.
    pub fn new(
        client: ChatClient,
        throttler: RequestThrottler,
        credentials: CredentialStore,
        store: StoreHandle,
    ) -> Self {
        Self {
            client,
            batch: BatchCoordinator::new(throttler.clone()),
            throttler,
            credentials,
            store,
            group_size: DEFAULT_GROUP_SIZE,
        }
    }

    /// Replace the batch group size and return the updated translator.
    pub fn with_group_size(mut self, group_size: usize) -> Self {
        self.group_size = group_size;
        self
    }

    /// The shared lane every remote call of this translator goes through.
    pub fn throttler(&self) -> &RequestThrottler {
        &self.throttler
    }

    /// Translate one fragment with the stored settings.
    #[instrument(level = "debug", skip_all, fields(chars = text.chars().count()))]
    pub async fn translate_text(&self, text: &str) -> Result<String, RequestError> {
        let key = self.api_key().await?;
        let settings = self.settings_or_default().await;
        self.submit(key, prompt::for_translation(&settings), preprocess(text))
            .await
    }

    /// Explain one fragment with the stored settings.
    #[instrument(level = "debug", skip_all, fields(chars = text.chars().count()))]
    pub async fn explain_text(&self, text: &str) -> Result<String, RequestError> {
        let key = self.api_key().await?;
        let settings = self.settings_or_default().await;
        self.submit(key, prompt::for_explanation(&settings), text.to_string())
            .await
    }

    /// Like [`translate_text`](Self::translate_text), but answers from the offline
    /// phrase dictionary when the remote call fails and the phrase is known.
    pub async fn translate_text_or_offline(&self, text: &str) -> Result<String, RequestError> {
        match self.translate_text(text).await {
            Ok(translated) => Ok(translated),
            Err(e) => match offline_translate(text) {
                Some(hit) => {
                    info!(error = %e, "remote translation failed, using offline dictionary");
                    Ok(hit.to_string())
                }
                None => Err(e),
            },
        }
    }

    /// Translate many fragments, one slot per input; failed fragments are `None`.
    ///
    /// Fragments rejected by [`is_translatable_text`] are returned unchanged without a remote
    /// call and do not count towards progress. Fails as a whole only when no credential is
    /// configured. The progress listener receives [`Progress::Done`] in every case.
    #[instrument(level = "debug", skip_all, fields(texts = texts.len()))]
    pub async fn translate_batch(
        &self,
        texts: Vec<String>,
        on_progress: Option<ProgressFn>,
    ) -> Result<Vec<Option<String>>, RequestError> {
        let key: Arc<str> = match self.api_key().await {
            Ok(key) => key.into(),
            Err(e) => {
                if let Some(listener) = on_progress {
                    listener(Progress::Done);
                }
                return Err(e);
            }
        };
        let settings = self.settings_or_default().await;
        let system: Arc<str> = prompt::for_translation(&settings).into();
        let client = self.client.clone();

        let processor = move |text: String| {
            let client = client.clone();
            let key = Arc::clone(&key);
            let system = Arc::clone(&system);
            async move { client.complete(&key, &system, &preprocess(&text)).await }
        };
        let (slots, pending): (Vec<usize>, Vec<String>) = texts
            .iter()
            .enumerate()
            .filter(|(_, text)| is_translatable_text(text))
            .map(|(i, text)| (i, text.clone()))
            .unzip();
        debug!(
            skipped = texts.len() - pending.len(),
            "untranslatable fragments kept as-is"
        );

        let translated = self
            .batch
            .run_batch(pending, processor, self.group_size, on_progress)
            .await;

        let mut results: Vec<Option<String>> = texts.into_iter().map(Some).collect();
        for (slot, out) in slots.into_iter().zip(translated) {
            results[slot] = out;
        }
        Ok(results)
    }

    /// In-memory call counter and last outcome of the shared throttler.
    pub fn usage(&self) -> ApiUsage {
        ApiUsage {
            call_count: self.throttler.call_count(),
            last_status: self.throttler.last_status(),
        }
    }

    /// Zero the call counter in memory and in the store; the last status is kept.
    pub async fn reset_usage(&self) -> Result<(), CoreError> {
        self.throttler.reset_call_count().await
    }

    /// Stored settings; missing keys fall back to their defaults.
    pub async fn settings(&self) -> Result<TranslationSettings, CoreError> {
        Ok(settings::load(self.store.as_ref()).await?)
    }

    /// Persist all three settings in one write.
    pub async fn save_settings(&self, settings: &TranslationSettings) -> Result<(), CoreError> {
        settings::save(self.store.as_ref(), settings).await?;
        debug!(style = %settings.style, level = %settings.level, "translation settings saved");
        Ok(())
    }

    /// Store the credential and mark onboarding as done.
    pub async fn save_api_key(&self, api_key: &str, session_only: bool) -> Result<(), CoreError> {
        self.credentials.try_store(api_key, session_only).await?;
        set_one(self.store.as_ref(), keys::API_KEY_SET, true).await?;
        info!(session_only, "api key saved");
        Ok(())
    }

    /// Remove the credential from both areas and drop the onboarding marker.
    pub async fn clear_api_key(&self) -> Result<(), CoreError> {
        self.credentials.try_clear().await?;
        self.store.remove(&[keys::API_KEY_SET]).await?;
        info!("api key cleared");
        Ok(())
    }

    /// Whether a credential exists and which area it lives in.
    pub async fn check_api_key(&self) -> KeyStatus {
        KeyStatus {
            has_key: self.credentials.exists().await,
            storage_type: self.credentials.storage_class().await,
        }
    }

    async fn api_key(&self) -> Result<String, RequestError> {
        self.credentials
            .retrieve()
            .await
            .ok_or_else(|| RequestError::NotConfigured(NOT_CONFIGURED.into()))
    }

    async fn settings_or_default(&self) -> TranslationSettings {
        self.settings().await.unwrap_or_else(|e| {
            warn!(error = %e, "failed to read translation settings, using defaults");
            TranslationSettings::default()
        })
    }

    fn submit(&self, key: String, system: String, text: String) -> RequestHandle<String> {
        let client = self.client.clone();
        self.throttler.enqueue(move || {
            let client = client.clone();
            let key = key.clone();
            let system = system.clone();
            let text = text.clone();
            async move { client.complete(&key, &system, &text).await }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        net::SocketAddr,
        sync::{Arc, Mutex},
    };

    use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
    use serde_json::{Value, json};

    use hng_core::{MemoryStore, ThrottlerContext, store::get_one};
    use hng_model::{LastStatus, StorageClass, ThrottleStrategy, TranslationStyle};

    use super::*;
    use crate::config::ChatConfig;

    type Seen = Arc<Mutex<Vec<(String, String)>>>;

    /// Mock upstream: echoes `hi:<user>`; answers 400 for the user text `fail`.
    async fn upstream(State(seen): State<Seen>, Json(body): Json<Value>) -> impl IntoResponse {
        let system = body["messages"][0]["content"].as_str().unwrap_or_default().to_string();
        let user = body["messages"][1]["content"].as_str().unwrap_or_default().to_string();
        seen.lock().unwrap().push((system, user.clone()));
        if user == "fail" {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": { "message": "bad input" } })),
            );
        }
        (
            StatusCode::OK,
            Json(json!({ "choices": [{ "message": { "content": format!("hi:{user}") } }] })),
        )
    }

    async fn serve(seen: Seen) -> SocketAddr {
        let router = Router::new()
            .route("/v1/chat/completions", post(upstream))
            .with_state(seen);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    fn translator(addr: SocketAddr) -> (Translator, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let strategy = ThrottleStrategy {
            throttle_delay_ms: 1,
            max_retries: 1,
            initial_backoff_ms: 1,
            timeout_ms: 5_000,
            ..Default::default()
        };
        let throttler =
            RequestThrottler::new(strategy, ThrottlerContext::default().with_store(store.clone()))
                .unwrap();
        let client = ChatClient::new(ChatConfig {
            endpoint: format!("http://{addr}/v1/chat/completions"),
            ..Default::default()
        })
        .unwrap();
        let credentials = CredentialStore::with_memory_session(store.clone());
        (
            Translator::new(client, throttler, credentials, store.clone()),
            store,
        )
    }

    #[tokio::test]
    async fn missing_key_is_not_configured_and_never_enqueued() {
        let seen = Seen::default();
        let addr = serve(seen.clone()).await;
        let (t, _) = translator(addr);

        let err = t.translate_text("hello").await.unwrap_err();

        assert_eq!(err, RequestError::NotConfigured(NOT_CONFIGURED.into()));
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(t.usage().last_status, None);
    }

    #[tokio::test]
    async fn translate_uses_stored_settings_and_counts_calls() {
        let seen = Seen::default();
        let addr = serve(seen.clone()).await;
        let (t, _) = translator(addr);
        t.save_api_key("sk-test", false).await.unwrap();
        t.save_settings(&TranslationSettings {
            style: TranslationStyle::Formal,
            ..Default::default()
        })
        .await
        .unwrap();

        let out = t.translate_text("helloनमस्ते").await.unwrap();

        assert_eq!(out, "hi:hello नमस्ते");
        let (system, _) = seen.lock().unwrap()[0].clone();
        assert!(system.contains("formal Hinglish"), "{system}");
        assert_eq!(
            t.usage(),
            ApiUsage {
                call_count: 1,
                last_status: Some(LastStatus::Success)
            }
        );
    }

    #[tokio::test]
    async fn explain_uses_explanation_prompt() {
        let seen = Seen::default();
        let addr = serve(seen.clone()).await;
        let (t, _) = translator(addr);
        t.save_api_key("sk-test", true).await.unwrap();

        t.explain_text("recursion").await.unwrap();

        let (system, user) = seen.lock().unwrap()[0].clone();
        assert!(system.starts_with("You are an AI assistant that explains concepts"));
        assert_eq!(user, "recursion");
    }

    #[tokio::test]
    async fn batch_keeps_failed_slots() {
        let seen = Seen::default();
        let addr = serve(seen.clone()).await;
        let (t, _) = translator(addr);
        t.save_api_key("sk-test", false).await.unwrap();

        let progress = Arc::new(Mutex::new(Vec::new()));
        let sink = progress.clone();
        let listener: ProgressFn = Arc::new(move |p| sink.lock().unwrap().push(p));

        let texts = vec!["one".to_string(), "fail".to_string(), "three".to_string()];
        let results = t.translate_batch(texts, Some(listener)).await.unwrap();

        assert_eq!(
            results,
            vec![Some("hi:one".to_string()), None, Some("hi:three".to_string())]
        );
        assert_eq!(progress.lock().unwrap().last(), Some(&Progress::Done));
    }

    #[tokio::test]
    async fn batch_keeps_untranslatable_fragments_without_calling_upstream() {
        let seen = Seen::default();
        let addr = serve(seen.clone()).await;
        let (t, _) = translator(addr);
        t.save_api_key("sk-test", false).await.unwrap();

        let texts = vec!["7".to_string(), "hello".into(), "{x}".into(), " a ".into()];
        let results = t.translate_batch(texts, None).await.unwrap();

        assert_eq!(
            results,
            vec![
                Some("7".to_string()),
                Some("hi:hello".to_string()),
                Some("{x}".to_string()),
                Some(" a ".to_string()),
            ]
        );
        let users: Vec<String> = seen.lock().unwrap().iter().map(|(_, u)| u.clone()).collect();
        assert_eq!(users, vec!["hello".to_string()]);
        assert_eq!(t.usage().call_count, 1);
    }

    #[tokio::test]
    async fn batch_without_key_fails_and_signals_done() {
        let seen = Seen::default();
        let addr = serve(seen.clone()).await;
        let (t, _) = translator(addr);

        let progress = Arc::new(Mutex::new(Vec::new()));
        let sink = progress.clone();
        let listener: ProgressFn = Arc::new(move |p| sink.lock().unwrap().push(p));

        let err = t
            .translate_batch(vec!["x".into()], Some(listener))
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::NotConfigured(_)));
        assert_eq!(*progress.lock().unwrap(), vec![Progress::Done]);
    }

    #[tokio::test]
    async fn offline_dictionary_covers_unreachable_remote() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let (t, _) = translator(addr);
        t.save_api_key("sk-test", false).await.unwrap();

        assert_eq!(t.translate_text_or_offline("Hello").await.unwrap(), "नमस्ते");
        assert!(t.translate_text_or_offline("good night").await.is_err());
        assert_eq!(t.usage().last_status, Some(LastStatus::Failed));
    }

    #[tokio::test]
    async fn key_lifecycle_tracks_onboarding_marker() {
        let seen = Seen::default();
        let addr = serve(seen).await;
        let (t, store) = translator(addr);

        assert_eq!(
            t.check_api_key().await,
            KeyStatus {
                has_key: false,
                storage_type: Some(StorageClass::Persistent)
            }
        );

        t.save_api_key("sk-test", true).await.unwrap();
        assert_eq!(
            t.check_api_key().await,
            KeyStatus {
                has_key: true,
                storage_type: Some(StorageClass::Session)
            }
        );
        assert_eq!(
            get_one(store.as_ref(), keys::API_KEY_SET).await.unwrap(),
            Some(json!(true))
        );

        t.clear_api_key().await.unwrap();
        assert!(!t.check_api_key().await.has_key);
        assert_eq!(get_one(store.as_ref(), keys::API_KEY_SET).await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_key_is_rejected() {
        let seen = Seen::default();
        let addr = serve(seen).await;
        let (t, _) = translator(addr);

        assert!(matches!(
            t.save_api_key("", false).await,
            Err(CoreError::Credential(hng_core::CredentialError::Empty))
        ));
    }

    #[tokio::test]
    async fn reset_usage_zeroes_counter() {
        let seen = Seen::default();
        let addr = serve(seen).await;
        let (t, _) = translator(addr);
        t.save_api_key("sk-test", false).await.unwrap();
        t.translate_text("hello").await.unwrap();

        t.reset_usage().await.unwrap();
        assert_eq!(t.usage().call_count, 0);
        assert_eq!(t.usage().last_status, Some(LastStatus::Success));
    }
}
