//! REST API client for the n8n execution endpoints.
//!
//! Wraps the engine's public API (`/api/v1/executions`) for fetching,
//! listing and stopping executions. Every request carries the static
//! `X-N8N-API-KEY` header.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use crate::webhook::parse_reply_body;

/// Header n8n reads the API key from.
pub const API_KEY_HEADER: &str = "X-N8N-API-KEY";

/// Errors from the n8n REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum N8nApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// n8n returned a non-2xx status code.
    #[error("n8n API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Parsed (or `{message}`-wrapped) response body.
        body: Value,
    },

    /// A 2xx body that does not have the expected shape.
    #[error("Unexpected n8n response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL cannot carry a path.
    #[error("Invalid n8n base URL: {0}")]
    InvalidUrl(String),
}

/// Execution operations the management endpoint needs from the engine.
#[async_trait]
pub trait ExecutionControl: Send + Sync {
    /// Ask the engine to stop a running execution.
    async fn stop_execution(&self, execution_id: &str) -> Result<Value, N8nApiError>;

    /// Fetch one execution's current state.
    async fn get_execution(&self, execution_id: &str) -> Result<Value, N8nApiError>;

    /// List executions currently in the `running` state.
    async fn list_running(&self, limit: u32) -> Result<Vec<Value>, N8nApiError>;
}

/// Page envelope returned by `GET /api/v1/executions`.
#[derive(Debug, Deserialize)]
struct ExecutionPage {
    #[serde(default)]
    data: Vec<Value>,
}

/// HTTP client for one n8n instance.
#[derive(Clone)]
pub struct N8nApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl N8nApi {
    /// * `base_url` - Instance root, e.g. `http://host:5678` (no trailing slash).
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            api_key: api_key.into(),
        }
    }

    fn executions_url(&self) -> String {
        format!("{}/api/v1/executions", self.base_url)
    }

    /// `{executions_url}/{execution_id}[/{suffix}]`, with the id encoded as
    /// a single path segment.
    fn execution_url(&self, execution_id: &str, suffix: Option<&str>) -> Result<Url, N8nApiError> {
        let invalid = || N8nApiError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.executions_url()).map_err(|_| invalid())?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| invalid())?;
            segments.push(execution_id);
            if let Some(suffix) = suffix {
                segments.push(suffix);
            }
        }
        Ok(url)
    }

    // ---- private helpers ----

    /// Return the JSON body of a successful response, or an
    /// [`N8nApiError::ApiError`] carrying the status and normalised body.
    async fn read_json(response: reqwest::Response) -> Result<Value, N8nApiError> {
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let text = response.text().await?;
        let body = parse_reply_body(content_type.as_deref(), text);

        if !status.is_success() {
            return Err(N8nApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

/// Pull the execution list out of a `GET /api/v1/executions` body.
fn parse_page(body: Value) -> Result<Vec<Value>, N8nApiError> {
    let page: ExecutionPage = serde_json::from_value(body)?;
    Ok(page.data)
}

#[async_trait]
impl ExecutionControl for N8nApi {
    async fn stop_execution(&self, execution_id: &str) -> Result<Value, N8nApiError> {
        let response = self
            .client
            .post(self.execution_url(execution_id, Some("stop"))?)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn get_execution(&self, execution_id: &str) -> Result<Value, N8nApiError> {
        let response = self
            .client
            .get(self.execution_url(execution_id, None)?)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn list_running(&self, limit: u32) -> Result<Vec<Value>, N8nApiError> {
        let response = self
            .client
            .get(self.executions_url())
            .query(&[("status", "running".to_string()), ("limit", limit.to_string())])
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        parse_page(Self::read_json(response).await?)
    }
}
