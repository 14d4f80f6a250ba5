pub mod automation_runs;
pub mod events;
pub mod executions;
pub mod orchestrator;
pub mod products;
pub mod proxy;
pub mod webhook_attempts;

use productflow_n8n::WebhookReply;
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Body of a successful engine reply; a non-2xx reply becomes
/// [`AppError::Upstream`] so the caller sees the engine's status code.
pub(crate) fn reply_data(reply: WebhookReply) -> AppResult<Value> {
    if reply.is_success() {
        Ok(reply.body)
    } else {
        Err(AppError::Upstream {
            status: reply.status,
            body: reply.body,
        })
    }
}
