//! Repository for the `webhook_attempts` outbox.

use productflow_core::types::{DbId, ProductId};
use sqlx::PgPool;

use crate::models::webhook_attempt::{AttemptOutcome, NewWebhookAttempt, WebhookAttempt};

const COLUMNS: &str = "\
    id, product_id, trigger_kind, url, payload, status, response_status_code, \
    response_body, error_message, attempt_count, last_attempted_at, created_at, updated_at";

pub struct WebhookAttemptRepo;

impl WebhookAttemptRepo {
    /// Persist the first attempt for a trigger.
    pub async fn record(pool: &PgPool, attempt: &NewWebhookAttempt) -> Result<WebhookAttempt, sqlx::Error> {
        let query = format!(
            "INSERT INTO webhook_attempts
                (product_id, trigger_kind, url, payload, status,
                 response_status_code, response_body, error_message)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WebhookAttempt>(&query)
            .bind(attempt.product_id)
            .bind(&attempt.trigger_kind)
            .bind(&attempt.url)
            .bind(&attempt.payload)
            .bind(attempt.outcome.status)
            .bind(attempt.outcome.response_status_code)
            .bind(&attempt.outcome.response_body)
            .bind(&attempt.outcome.error_message)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WebhookAttempt>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM webhook_attempts WHERE id = $1");
        sqlx::query_as::<_, WebhookAttempt>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Attempts for one product, newest first.
    pub async fn list_for_product(
        pool: &PgPool,
        product_id: ProductId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WebhookAttempt>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM webhook_attempts
             WHERE product_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, WebhookAttempt>(&query)
            .bind(product_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Overwrite the outcome after a manual retry and bump the counter.
    pub async fn record_retry(
        pool: &PgPool,
        id: DbId,
        outcome: &AttemptOutcome,
    ) -> Result<Option<WebhookAttempt>, sqlx::Error> {
        let query = format!(
            "UPDATE webhook_attempts SET
                status = $2,
                response_status_code = $3,
                response_body = $4,
                error_message = $5,
                attempt_count = attempt_count + 1,
                last_attempted_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WebhookAttempt>(&query)
            .bind(id)
            .bind(outcome.status)
            .bind(outcome.response_status_code)
            .bind(&outcome.response_body)
            .bind(&outcome.error_message)
            .fetch_optional(pool)
            .await
    }
}
