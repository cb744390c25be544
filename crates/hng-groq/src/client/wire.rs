//! Chat-completion wire types (OpenAI-compatible subset).
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub messages: [ChatMessage<'a>; 2],
    pub model: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> ChatMessage<'a> {
    pub fn system(content: &'a str) -> Self {
        Self {
            role: "system",
            content,
        }
    }

    pub fn user(content: &'a str) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Trimmed content of the first choice, `None` when missing or blank.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

/// Human-readable message for a non-2xx response.
pub(crate) fn error_message(status: u16, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("API error: {status}"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_body_shape() {
        let body = ChatRequest {
            messages: [ChatMessage::system("sys"), ChatMessage::user("hello")],
            model: "m",
            temperature: 0.5,
            max_tokens: 10,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "messages": [
                    { "role": "system", "content": "sys" },
                    { "role": "user", "content": "hello" }
                ],
                "model": "m",
                "temperature": 0.5,
                "max_tokens": 10
            })
        );
    }

    #[test]
    fn first_content_is_trimmed() {
        let resp: ChatResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "content": "  namaste duniya \n" } }]
        }))
        .unwrap();
        assert_eq!(resp.first_content(), Some("namaste duniya"));

        let blank: ChatResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "content": "   " } }]
        }))
        .unwrap();
        assert_eq!(blank.first_content(), None);

        let empty: ChatResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.first_content(), None);
    }

    #[test]
    fn error_message_prefers_body() {
        let body = br#"{"error":{"message":"Invalid API Key"}}"#;
        assert_eq!(error_message(401, body), "Invalid API Key");
        assert_eq!(error_message(503, b"<html>"), "API error: 503");
        assert_eq!(error_message(500, br#"{"error":{}}"#), "API error: 500");
    }
}
