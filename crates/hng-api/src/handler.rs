use async_trait::async_trait;
use hng_core::ProgressFn;
use hng_groq::{ApiUsage, KeyStatus};
use hng_model::TranslationSettings;

use crate::error::ApiError;

/// Translation API handler.
///
/// Abstracts the backend so the router can be mounted over [`TranslatorAdapter`](crate::TranslatorAdapter)
/// or a custom implementation (auth, caching and so on).
#[async_trait]
pub trait ApiHandler: Send + Sync + 'static {
    /// Translate one fragment. With `allow_offline`, known phrases are answered locally when
    /// the remote call fails.
    async fn translate(&self, text: &str, allow_offline: bool) -> Result<String, ApiError>;

    /// Explain one fragment.
    async fn explain(&self, text: &str) -> Result<String, ApiError>;

    /// Translate many fragments; failed fragments are `None`.
    ///
    /// The listener, when given, must receive [`Progress::Done`](hng_model::Progress::Done)
    /// before this returns, whether or not the batch succeeded.
    async fn translate_batch(
        &self,
        texts: Vec<String>,
        on_progress: Option<ProgressFn>,
    ) -> Result<Vec<Option<String>>, ApiError>;

    async fn usage(&self) -> Result<ApiUsage, ApiError>;

    async fn reset_usage(&self) -> Result<(), ApiError>;

    async fn key_status(&self) -> Result<KeyStatus, ApiError>;

    async fn save_key(&self, api_key: &str, session_only: bool) -> Result<(), ApiError>;

    async fn clear_key(&self) -> Result<(), ApiError>;

    async fn settings(&self) -> Result<TranslationSettings, ApiError>;

    async fn save_settings(&self, settings: TranslationSettings) -> Result<(), ApiError>;
}
