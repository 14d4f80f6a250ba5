#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;

use productflow_api::config::{OrchestratorMode, ServerConfig};
use productflow_api::router::build_app_router;
use productflow_api::state::AppState;
use productflow_events::EventBus;
use productflow_n8n::{ExecutionControl, N8nApiError, WebhookDispatch, WebhookError, WebhookReply};

pub const N8N_BASE_URL: &str = "http://n8n.test";

/// Build a test `ServerConfig` pointing at a fake engine.
pub fn test_config(mode: OrchestratorMode) -> ServerConfig {
    let mut config = ServerConfig::from_lookup(|key| match key {
        "N8N_BASE_URL" => Some(N8N_BASE_URL.to_string()),
        "N8N_API_KEY" => Some("test-key".to_string()),
        _ => None,
    })
    .unwrap();
    config.orchestrator_mode = mode;
    config
}

/// A pool that never connects until used; for tests that stay off the database.
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .connect_lazy("postgres://postgres@localhost/productflow_unused")
        .unwrap()
}

// ---------------------------------------------------------------------------
// Fake automation engine
// ---------------------------------------------------------------------------

/// Records every webhook POST and answers from a fixed script.
pub struct RecordingDispatch {
    replies: Mutex<Vec<Result<WebhookReply, String>>>,
    fallback: Result<WebhookReply, String>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl RecordingDispatch {
    pub fn replying(status: u16, body: Value) -> Self {
        Self::scripted(Vec::new(), Ok(WebhookReply { status, body }))
    }

    pub fn failing(message: &str) -> Self {
        Self::scripted(Vec::new(), Err(message.to_string()))
    }

    /// Answer with `replies` in order, then with `fallback`.
    pub fn scripted(
        replies: Vec<Result<WebhookReply, String>>,
        fallback: Result<WebhookReply, String>,
    ) -> Self {
        Self {
            replies: Mutex::new(replies),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebhookDispatch for RecordingDispatch {
    async fn post_json(&self, url: &str, payload: &Value) -> Result<WebhookReply, WebhookError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));

        let next = {
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                self.fallback.clone()
            } else {
                replies.remove(0)
            }
        };
        next.map_err(WebhookError::Transport)
    }
}

/// Execution API fake. Ids starting with `missing` answer 404.
#[derive(Default)]
pub struct FakeExecutions {
    pub stop_fails: bool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeExecutions {
    fn not_found(id: &str) -> N8nApiError {
        N8nApiError::ApiError {
            status: 404,
            body: json!({ "message": format!("Execution {id} not found") }),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExecutionControl for FakeExecutions {
    async fn stop_execution(&self, execution_id: &str) -> Result<Value, N8nApiError> {
        self.calls.lock().unwrap().push(format!("stop:{execution_id}"));
        if self.stop_fails {
            return Err(Self::not_found(execution_id));
        }
        Ok(json!({ "id": execution_id, "status": "canceled" }))
    }

    async fn get_execution(&self, execution_id: &str) -> Result<Value, N8nApiError> {
        self.calls.lock().unwrap().push(format!("get:{execution_id}"));
        if execution_id.starts_with("missing") {
            return Err(Self::not_found(execution_id));
        }
        Ok(json!({ "id": execution_id, "status": "running" }))
    }

    async fn list_running(&self, limit: u32) -> Result<Vec<Value>, N8nApiError> {
        self.calls.lock().unwrap().push(format!("list:{limit}"));
        Ok((1..=limit.min(2))
            .map(|i| json!({ "id": i.to_string(), "status": "running" }))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Router plus handles on the fakes behind it.
pub struct TestApp {
    pub router: Router,
    pub dispatch: Arc<RecordingDispatch>,
    pub executions: Arc<FakeExecutions>,
    pub event_bus: Arc<EventBus>,
}

impl TestApp {
    pub fn new(pool: PgPool, dispatch: RecordingDispatch) -> Self {
        Self::with(pool, dispatch, FakeExecutions::default(), OrchestratorMode::Live)
    }

    /// Build the full application router (same middleware stack as
    /// production) over the given fakes.
    pub fn with(
        pool: PgPool,
        dispatch: RecordingDispatch,
        executions: FakeExecutions,
        mode: OrchestratorMode,
    ) -> Self {
        let config = test_config(mode);
        let dispatch = Arc::new(dispatch);
        let executions = Arc::new(executions);
        let event_bus = Arc::new(EventBus::default());

        let state = AppState {
            pool,
            config: Arc::new(config.clone()),
            webhooks: dispatch.clone(),
            executions: executions.clone(),
            event_bus: event_bus.clone(),
        };

        Self {
            router: build_app_router(state, &config),
            dispatch,
            executions,
            event_bus,
        }
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Response<Body> {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
