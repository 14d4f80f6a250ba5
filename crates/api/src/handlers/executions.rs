//! Handler for `POST /api/v1/executions`.
//!
//! One endpoint, four actions. The body is parsed into an
//! [`ExecutionCommand`] first, so each arm below only sees the parameters
//! its action needs.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use productflow_core::executions::ExecutionCommand;
use productflow_core::payload::TRIGGER_SOURCE_DASHBOARD;
use productflow_core::webhook::WebhookKind;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::handlers::reply_data;
use crate::state::AppState;

/// POST /api/v1/executions
///
/// Body: `{ "action": "stop" | "status" | "resume" | "list-running", ... }`.
pub async fn manage_execution(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(body) = body?;
    let command = ExecutionCommand::from_request(&body)?;
    tracing::debug!(action = command.action().as_str(), "Execution command received");

    let response = match command {
        ExecutionCommand::Stop { execution_id } => stop(&state, execution_id).await,
        ExecutionCommand::Status { execution_id } => {
            let data = state.executions.get_execution(&execution_id).await?;
            json!({
                "success": true,
                "action": "status",
                "execution_id": execution_id,
                "data": data,
            })
        }
        ExecutionCommand::Resume {
            product_id,
            product,
        } => {
            let payload = json!({
                "product_id": product_id,
                "product": product,
                "resume_from_checkpoint": true,
                "triggered_at": Utc::now().to_rfc3339(),
                "trigger_source": TRIGGER_SOURCE_DASHBOARD,
            });
            let url = state.config.n8n.webhook_urls.url(WebhookKind::Resume);
            tracing::info!(%product_id, "Resuming generation from checkpoint");

            let reply = state.webhooks.post_json(url, &payload).await?;
            json!({
                "success": true,
                "action": "resume",
                "product_id": product_id,
                "data": reply_data(reply)?,
            })
        }
        ExecutionCommand::ListRunning { limit } => {
            let data = state.executions.list_running(limit).await?;
            json!({
                "success": true,
                "action": "list-running",
                "count": data.len(),
                "data": data,
            })
        }
    };

    Ok(Json(response))
}

/// Stop is best effort: the dashboard marks the run stopped locally either
/// way, so an engine failure is reported as a warning, not an error.
async fn stop(state: &AppState, execution_id: String) -> Value {
    match state.executions.stop_execution(&execution_id).await {
        Ok(data) => {
            tracing::info!(%execution_id, "Execution stopped");
            json!({
                "success": true,
                "action": "stop",
                "execution_id": execution_id,
                "stopped": true,
                "data": data,
            })
        }
        Err(e) => {
            tracing::warn!(%execution_id, error = %e, "Engine stop failed, reporting soft failure");
            json!({
                "success": true,
                "action": "stop",
                "execution_id": execution_id,
                "stopped": false,
                "warning": format!("Engine did not confirm the stop: {e}"),
            })
        }
    }
}
