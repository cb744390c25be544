//! Async client for an OpenAI-compatible chat-completion endpoint.
mod wire;

use std::sync::Arc;

use reqwest::{Client, Url};
use tracing::{debug, trace};

use hng_core::RequestError;

use crate::{config::ChatConfig, error::GroqError};
use wire::{ChatMessage, ChatRequest, ChatResponse, error_message};

/// Chat-completion client. Cheap to clone; clones share one connection pool.
#[derive(Clone, Debug)]
pub struct ChatClient {
    http: Client,
    endpoint: Url,
    config: Arc<ChatConfig>,
}

impl ChatClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint is not a valid URL or the HTTP client cannot be constructed.
    pub fn new(config: ChatConfig) -> Result<Self, GroqError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| GroqError::InvalidConfig(format!("endpoint '{}': {e}", config.endpoint)))?;
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoint,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Send one system + user exchange and return the trimmed reply.
    ///
    /// Non-2xx responses map to [`RequestError::Http`] carrying the remote error message;
    /// a blank reply maps to [`RequestError::EmptyResponse`].
    pub async fn complete(
        &self,
        api_key: &str,
        system: &str,
        user: &str,
    ) -> Result<String, RequestError> {
        let body = ChatRequest {
            messages: [ChatMessage::system(system), ChatMessage::user(user)],
            model: &self.config.model,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };
        trace!(model = %self.config.model, chars = user.chars().count(), "chat completion request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            let message = error_message(status.as_u16(), &bytes);
            debug!(status = status.as_u16(), %message, "chat completion rejected");
            return Err(RequestError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = serde_json::from_slice(&bytes)
            .map_err(|e| RequestError::Decode(format!("invalid chat completion payload: {e}")))?;
        parsed
            .first_content()
            .map(str::to_owned)
            .ok_or(RequestError::EmptyResponse)
    }

    fn map_transport_error(&self, error: reqwest::Error) -> RequestError {
        if error.is_timeout() {
            RequestError::Timeout {
                timeout_ms: self.config.request_timeout_ms,
            }
        } else {
            RequestError::Transport(error.to_string())
        }
    }
}
