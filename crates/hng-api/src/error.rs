use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use hng_core::{CoreError, CredentialError, RequestError};

/// Errors surfaced by the HTTP API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No API credential is configured.
    #[error("{0}")]
    NotConfigured(String),
    /// Malformed or empty client input.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// The remote completion service failed after retries.
    #[error("{0}")]
    Upstream(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotConfigured(_) => StatusCode::PRECONDITION_FAILED,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::NotConfigured(msg) => ApiError::NotConfigured(msg),
            RequestError::Canceled | RequestError::Internal(_) => {
                ApiError::Internal(err.to_string())
            }
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Credential(CredentialError::Empty) => {
                ApiError::InvalidRequest("api key cannot be empty".into())
            }
            CoreError::Credential(e @ CredentialError::Encode(_)) => {
                ApiError::InvalidRequest(e.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}
