use async_trait::async_trait;
use hng_core::ProgressFn;
use hng_groq::{ApiUsage, KeyStatus, Translator};
use hng_model::TranslationSettings;

use crate::error::ApiError;
use crate::handler::ApiHandler;

/// Adapter that bridges [`Translator`] to [`ApiHandler`] by direct delegation.
pub struct TranslatorAdapter {
    translator: Translator,
}

impl TranslatorAdapter {
    pub fn new(translator: Translator) -> Self {
        Self { translator }
    }
}

#[async_trait]
impl ApiHandler for TranslatorAdapter {
    async fn translate(&self, text: &str, allow_offline: bool) -> Result<String, ApiError> {
        let out = if allow_offline {
            self.translator.translate_text_or_offline(text).await
        } else {
            self.translator.translate_text(text).await
        };
        out.map_err(ApiError::from)
    }

    async fn explain(&self, text: &str) -> Result<String, ApiError> {
        self.translator
            .explain_text(text)
            .await
            .map_err(ApiError::from)
    }

    async fn translate_batch(
        &self,
        texts: Vec<String>,
        on_progress: Option<ProgressFn>,
    ) -> Result<Vec<Option<String>>, ApiError> {
        self.translator
            .translate_batch(texts, on_progress)
            .await
            .map_err(ApiError::from)
    }

    async fn usage(&self) -> Result<ApiUsage, ApiError> {
        Ok(self.translator.usage())
    }

    async fn reset_usage(&self) -> Result<(), ApiError> {
        self.translator.reset_usage().await.map_err(ApiError::from)
    }

    async fn key_status(&self) -> Result<KeyStatus, ApiError> {
        Ok(self.translator.check_api_key().await)
    }

    async fn save_key(&self, api_key: &str, session_only: bool) -> Result<(), ApiError> {
        self.translator
            .save_api_key(api_key, session_only)
            .await
            .map_err(ApiError::from)
    }

    async fn clear_key(&self) -> Result<(), ApiError> {
        self.translator.clear_api_key().await.map_err(ApiError::from)
    }

    async fn settings(&self) -> Result<TranslationSettings, ApiError> {
        self.translator.settings().await.map_err(ApiError::from)
    }

    async fn save_settings(&self, settings: TranslationSettings) -> Result<(), ApiError> {
        self.translator
            .save_settings(&settings)
            .await
            .map_err(ApiError::from)
    }
}
