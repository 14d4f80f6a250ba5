//! Outbound webhook POSTs.
//!
//! [`WebhookClient`] sends one JSON body per call and never retries; the
//! caller decides whether a failure is fatal. Whatever the engine answers
//! is normalised into a JSON [`WebhookReply`] so it can be relayed.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::{json, Value};

/// Error type for webhook calls that never produced an HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Transport failure reported by a dispatcher not backed by reqwest.
    #[error("Webhook transport failed: {0}")]
    Transport(String),
}

/// The engine's answer to a webhook POST.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookReply {
    /// HTTP status code returned by the engine.
    pub status: u16,
    /// Parsed JSON body, or `{ "message": <text> }` for non-JSON replies.
    pub body: Value,
}

impl WebhookReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can POST a JSON payload to a webhook URL.
#[async_trait]
pub trait WebhookDispatch: Send + Sync {
    async fn post_json(&self, url: &str, payload: &Value) -> Result<WebhookReply, WebhookError>;
}

/// reqwest-backed [`WebhookDispatch`].
#[derive(Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
}

impl WebhookClient {
    /// Reuse an existing [`reqwest::Client`] (shares its connection pool).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WebhookDispatch for WebhookClient {
    async fn post_json(&self, url: &str, payload: &Value) -> Result<WebhookReply, WebhookError> {
        let response = self.client.post(url).json(payload).send().await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let text = response.text().await?;

        tracing::debug!(url, status, "Webhook replied");

        Ok(WebhookReply {
            status,
            body: parse_reply_body(content_type.as_deref(), text),
        })
    }
}

/// Normalise a reply body to JSON.
///
/// JSON content types are parsed; anything else, or JSON that fails to
/// parse, is wrapped as `{ "message": <text> }`.
pub fn parse_reply_body(content_type: Option<&str>, text: String) -> Value {
    let is_json = content_type
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false);

    if is_json {
        if let Ok(value) = serde_json::from_str::<Value>(&text) {
            return value;
        }
    }

    json!({ "message": text })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_content_type_is_parsed() {
        let body = parse_reply_body(
            Some("application/json; charset=utf-8"),
            r#"{"executionId":"42"}"#.into(),
        );
        assert_eq!(body["executionId"], "42");
    }

    #[test]
    fn text_content_type_is_wrapped() {
        let body = parse_reply_body(Some("text/plain"), "Workflow was started".into());
        assert_eq!(body, json!({ "message": "Workflow was started" }));
    }

    #[test]
    fn missing_content_type_is_wrapped() {
        let body = parse_reply_body(None, "ok".into());
        assert_eq!(body, json!({ "message": "ok" }));
    }

    #[test]
    fn malformed_json_falls_back_to_message() {
        let body = parse_reply_body(Some("application/json"), "".into());
        assert_eq!(body, json!({ "message": "" }));
    }

    #[test]
    fn reply_success_range() {
        let ok = WebhookReply { status: 204, body: Value::Null };
        let redirect = WebhookReply { status: 302, body: Value::Null };
        let bad = WebhookReply { status: 502, body: Value::Null };
        assert!(ok.is_success());
        assert!(!redirect.is_success());
        assert!(!bad.is_success());
    }

    #[test]
    fn webhook_error_display_request() {
        // Build a reqwest error from an invalid URL.
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err = WebhookError::Request(req_err);
        assert!(err.to_string().contains("HTTP request failed"));
    }
}
