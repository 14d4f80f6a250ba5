//! Webhook-attempt (outbox) model.

use productflow_core::types::{DbId, ProductId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

pub const ATTEMPT_DELIVERED: &str = "delivered";
pub const ATTEMPT_FAILED: &str = "failed";

/// Response bodies are stored up to this many bytes.
const MAX_STORED_BODY: usize = 4096;

/// A row from the `webhook_attempts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WebhookAttempt {
    pub id: DbId,
    pub product_id: ProductId,
    pub trigger_kind: String,
    pub url: String,
    pub payload: serde_json::Value,
    pub status: String,
    pub response_status_code: Option<i16>,
    pub response_body: Option<String>,
    pub error_message: Option<String>,
    pub attempt_count: i16,
    pub last_attempted_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Result of one delivery attempt, as persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptOutcome {
    pub status: &'static str,
    pub response_status_code: Option<i16>,
    pub response_body: Option<String>,
    pub error_message: Option<String>,
}

impl AttemptOutcome {
    /// The engine answered; 2xx counts as delivered, anything else failed.
    pub fn from_response(status_code: u16, body: &serde_json::Value) -> Self {
        let delivered = (200..300).contains(&status_code);
        Self {
            status: if delivered { ATTEMPT_DELIVERED } else { ATTEMPT_FAILED },
            response_status_code: i16::try_from(status_code).ok(),
            response_body: Some(truncate(body.to_string())),
            error_message: (!delivered).then(|| format!("Webhook returned HTTP {status_code}")),
        }
    }

    /// The request never produced a response.
    pub fn unreachable(error: impl ToString) -> Self {
        Self {
            status: ATTEMPT_FAILED,
            response_status_code: None,
            response_body: None,
            error_message: Some(error.to_string()),
        }
    }

    pub fn is_delivered(&self) -> bool {
        self.status == ATTEMPT_DELIVERED
    }
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_STORED_BODY {
        let mut cut = MAX_STORED_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}

/// Insert parameters for a first attempt.
#[derive(Debug, Clone)]
pub struct NewWebhookAttempt {
    pub product_id: ProductId,
    pub trigger_kind: String,
    pub url: String,
    pub payload: serde_json::Value,
    pub outcome: AttemptOutcome,
}
