use std::{convert::Infallible, sync::Arc};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{
        IntoResponse,
        sse::{Event, Sse},
    },
    routing::{get, post},
};
use futures_util::{Stream, stream};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::mpsc;

use hng_core::ProgressFn;
use hng_model::{Progress, TranslationSettings};

use crate::{error::ApiError, handler::ApiHandler};

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: ApiHandler,
{
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - POST /api/v1/translate - Translate one fragment
    /// - POST /api/v1/explain - Explain one fragment
    /// - POST /api/v1/translate/batch - Translate many fragments
    /// - POST /api/v1/translate/batch/stream - Same, as server-sent `progress` events then a `result`
    /// - GET /api/v1/usage, POST /api/v1/usage/reset - Call counter
    /// - GET|PUT|DELETE /api/v1/key - API credential
    /// - GET|PUT /api/v1/settings - Translation settings
    pub fn router(self) -> Router {
        Router::new()
            .route("/api/v1/translate", post(translate::<H>))
            .route("/api/v1/explain", post(explain::<H>))
            .route("/api/v1/translate/batch", post(translate_batch::<H>))
            .route(
                "/api/v1/translate/batch/stream",
                post(translate_batch_stream::<H>),
            )
            .route("/api/v1/usage", get(usage::<H>))
            .route("/api/v1/usage/reset", post(reset_usage::<H>))
            .route(
                "/api/v1/key",
                get(key_status::<H>).put(save_key::<H>).delete(clear_key::<H>),
            )
            .route(
                "/api/v1/settings",
                get(settings::<H>).put(save_settings::<H>),
            )
            .with_state(self.handler)
    }
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextRequest {
    text: String,
    #[serde(default)]
    allow_offline: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct TextResponse {
    result: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct BatchRequest {
    texts: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BatchResponse {
    success: bool,
    results: Vec<Option<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveKeyRequest {
    api_key: String,
    #[serde(default)]
    session_only: bool,
}

// ============================================================================
// Handlers
// ============================================================================

fn non_empty(text: &str) -> Result<&str, ApiError> {
    if text.trim().is_empty() {
        return Err(ApiError::InvalidRequest("text cannot be empty".into()));
    }
    Ok(text)
}

/// POST /api/v1/translate
async fn translate<H>(
    State(handler): State<Arc<H>>,
    Json(req): Json<TextRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let result = handler
        .translate(non_empty(&req.text)?, req.allow_offline)
        .await?;
    Ok(Json(TextResponse { result }))
}

/// POST /api/v1/explain
async fn explain<H>(
    State(handler): State<Arc<H>>,
    Json(req): Json<TextRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let result = handler.explain(non_empty(&req.text)?).await?;
    Ok(Json(TextResponse { result }))
}

/// POST /api/v1/translate/batch
async fn translate_batch<H>(
    State(handler): State<Arc<H>>,
    Json(req): Json<BatchRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let results = handler.translate_batch(req.texts, None).await?;
    Ok(Json(BatchResponse {
        success: true,
        results,
    }))
}

/// POST /api/v1/translate/batch/stream
///
/// Emits `progress` events carrying `0..=100` and then `-1`, followed by exactly one
/// `result` (same body as the plain batch route) or `error` event.
async fn translate_batch_stream<H>(
    State(handler): State<Arc<H>>,
    Json(req): Json<BatchRequest>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
    H: ApiHandler,
{
    // (event, is_last)
    let (tx, rx) = mpsc::unbounded_channel::<(Event, bool)>();

    let progress_tx = tx.clone();
    let listener: ProgressFn = Arc::new(move |p: Progress| {
        let event = Event::default().event("progress").data(p.as_i32().to_string());
        let _ = progress_tx.send((event, false));
    });

    tokio::spawn(async move {
        let last = match handler.translate_batch(req.texts, Some(listener)).await {
            Ok(results) => json_event(
                "result",
                &BatchResponse {
                    success: true,
                    results,
                },
            ),
            Err(e) => json_event("error", &json!({ "error": e.to_string() })),
        };
        let _ = tx.send((last, true));
    });

    Sse::new(stream::unfold(Some(rx), |rx| async move {
        let mut rx = rx?;
        let (event, last) = rx.recv().await?;
        Some((Ok(event), (!last).then_some(rx)))
    }))
}

fn json_event(name: &str, body: &impl Serialize) -> Event {
    Event::default()
        .event(name)
        .json_data(body)
        .unwrap_or_else(|e| Event::default().event("error").data(e.to_string()))
}

/// GET /api/v1/usage
async fn usage<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    Ok(Json(handler.usage().await?))
}

/// POST /api/v1/usage/reset
async fn reset_usage<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    handler.reset_usage().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/key
async fn key_status<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    Ok(Json(handler.key_status().await?))
}

/// PUT /api/v1/key
async fn save_key<H>(
    State(handler): State<Arc<H>>,
    Json(req): Json<SaveKeyRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    handler.save_key(&req.api_key, req.session_only).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/key
async fn clear_key<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    handler.clear_key().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/settings
async fn settings<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    Ok(Json(handler.settings().await?))
}

/// PUT /api/v1/settings
async fn save_settings<H>(
    State(handler): State<Arc<H>>,
    Json(settings): Json<TranslationSettings>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    handler.save_settings(settings).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Method, Request},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use hng_groq::{ApiUsage, KeyStatus};
    use hng_model::{LastStatus, StorageClass, TranslationStyle};

    use super::*;

    #[derive(Default)]
    struct FakeHandler {
        key: Mutex<Option<(String, bool)>>,
        settings: Mutex<TranslationSettings>,
    }

    #[async_trait]
    impl ApiHandler for FakeHandler {
        async fn translate(&self, text: &str, allow_offline: bool) -> Result<String, ApiError> {
            if self.key.lock().unwrap().is_none() {
                return Err(ApiError::NotConfigured("Please configure your API key first".into()));
            }
            Ok(format!("{text}:{allow_offline}"))
        }

        async fn explain(&self, _text: &str) -> Result<String, ApiError> {
            Err(ApiError::Upstream("Invalid API Key".into()))
        }

        async fn translate_batch(
            &self,
            texts: Vec<String>,
            on_progress: Option<ProgressFn>,
        ) -> Result<Vec<Option<String>>, ApiError> {
            if let Some(listener) = on_progress {
                listener(Progress::Percent(50));
                listener(Progress::Done);
            }
            if texts.is_empty() {
                return Err(ApiError::InvalidRequest("no texts".into()));
            }
            Ok(texts
                .into_iter()
                .map(|t| (t != "bad").then(|| t.to_uppercase()))
                .collect())
        }

        async fn usage(&self) -> Result<ApiUsage, ApiError> {
            Ok(ApiUsage {
                call_count: 7,
                last_status: Some(LastStatus::RateLimited),
            })
        }

        async fn reset_usage(&self) -> Result<(), ApiError> {
            Ok(())
        }

        async fn key_status(&self) -> Result<KeyStatus, ApiError> {
            let key = self.key.lock().unwrap();
            Ok(KeyStatus {
                has_key: key.is_some(),
                storage_type: Some(StorageClass::from_session_flag(
                    key.as_ref().is_some_and(|(_, session)| *session),
                )),
            })
        }

        async fn save_key(&self, api_key: &str, session_only: bool) -> Result<(), ApiError> {
            if api_key.is_empty() {
                return Err(ApiError::InvalidRequest("api key cannot be empty".into()));
            }
            *self.key.lock().unwrap() = Some((api_key.to_string(), session_only));
            Ok(())
        }

        async fn clear_key(&self) -> Result<(), ApiError> {
            *self.key.lock().unwrap() = None;
            Ok(())
        }

        async fn settings(&self) -> Result<TranslationSettings, ApiError> {
            Ok(*self.settings.lock().unwrap())
        }

        async fn save_settings(&self, settings: TranslationSettings) -> Result<(), ApiError> {
            *self.settings.lock().unwrap() = settings;
            Ok(())
        }
    }

    fn router(handler: Arc<FakeHandler>) -> Router {
        HttpApi::new(handler).router()
    }

    async fn call(router: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let resp = router.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn translate_requires_key() {
        let handler = Arc::new(FakeHandler::default());

        let (status, body) = call(
            router(handler.clone()),
            Method::POST,
            "/api/v1/translate",
            Some(json!({ "text": "hello" })),
        )
        .await;
        assert_eq!(status, StatusCode::PRECONDITION_FAILED);
        assert_eq!(body, json!({ "error": "Please configure your API key first" }));

        let (status, _) = call(
            router(handler.clone()),
            Method::PUT,
            "/api/v1/key",
            Some(json!({ "apiKey": "sk-1", "sessionOnly": true })),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = call(
            router(handler),
            Method::POST,
            "/api/v1/translate",
            Some(json!({ "text": "hello", "allowOffline": true })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "result": "hello:true" }));
    }

    #[tokio::test]
    async fn blank_text_is_rejected() {
        let (status, body) = call(
            router(Arc::new(FakeHandler::default())),
            Method::POST,
            "/api/v1/explain",
            Some(json!({ "text": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("text cannot be empty"));
    }

    #[tokio::test]
    async fn upstream_failure_is_bad_gateway() {
        let (status, body) = call(
            router(Arc::new(FakeHandler::default())),
            Method::POST,
            "/api/v1/explain",
            Some(json!({ "text": "recursion" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body, json!({ "error": "Invalid API Key" }));
    }

    #[tokio::test]
    async fn batch_reports_null_slots() {
        let (status, body) = call(
            router(Arc::new(FakeHandler::default())),
            Method::POST,
            "/api/v1/translate/batch",
            Some(json!({ "texts": ["a", "bad", "c"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true, "results": ["A", null, "C"] }));
    }

    async fn stream(router: Router, body: Value) -> (StatusCode, String) {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/translate/batch/stream")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = router.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn batch_stream_reports_progress_then_result() {
        let (status, body) = stream(
            router(Arc::new(FakeHandler::default())),
            json!({ "texts": ["a", "bad"] }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let half = body.find("event: progress\ndata: 50\n").unwrap();
        let done = body.find("event: progress\ndata: -1\n").unwrap();
        let result = body.find("event: result\n").unwrap();
        assert!(half < done && done < result, "{body}");
        assert!(body.contains(r#"data: {"success":true,"results":["A",null]}"#), "{body}");
    }

    #[tokio::test]
    async fn batch_stream_failure_still_signals_done() {
        let (status, body) = stream(
            router(Arc::new(FakeHandler::default())),
            json!({ "texts": [] }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let done = body.find("data: -1\n").unwrap();
        let error = body.find("event: error\n").unwrap();
        assert!(done < error, "{body}");
        assert!(!body.contains("event: result"), "{body}");
    }

    #[tokio::test]
    async fn usage_is_camel_case() {
        let (status, body) = call(
            router(Arc::new(FakeHandler::default())),
            Method::GET,
            "/api/v1/usage",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "callCount": 7, "lastStatus": "rate-limited" }));

        let (status, _) = call(
            router(Arc::new(FakeHandler::default())),
            Method::POST,
            "/api/v1/usage/reset",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn key_lifecycle() {
        let handler = Arc::new(FakeHandler::default());

        let (_, body) = call(router(handler.clone()), Method::GET, "/api/v1/key", None).await;
        assert_eq!(body, json!({ "hasKey": false, "storageType": "persistent" }));

        call(
            router(handler.clone()),
            Method::PUT,
            "/api/v1/key",
            Some(json!({ "apiKey": "sk-1", "sessionOnly": true })),
        )
        .await;
        let (_, body) = call(router(handler.clone()), Method::GET, "/api/v1/key", None).await;
        assert_eq!(body, json!({ "hasKey": true, "storageType": "session" }));

        let (status, _) = call(router(handler.clone()), Method::DELETE, "/api/v1/key", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(handler.key.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn settings_round_trip_through_routes() {
        let handler = Arc::new(FakeHandler::default());

        let (status, _) = call(
            router(handler.clone()),
            Method::PUT,
            "/api/v1/settings",
            Some(json!({ "style": "formal" })),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(handler.settings.lock().unwrap().style, TranslationStyle::Formal);

        let (_, body) = call(router(handler), Method::GET, "/api/v1/settings", None).await;
        assert_eq!(body["style"], "formal");
        assert_eq!(body["level"], "balanced");
    }
}
