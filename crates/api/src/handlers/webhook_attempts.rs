//! Handlers for the webhook-attempt outbox.
//!
//! Every webhook the orchestrator fires leaves a row here. Operators list
//! them per product and re-send failed ones by hand.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use productflow_core::error::CoreError;
use productflow_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use productflow_core::types::{DbId, ProductId};
use productflow_db::models::webhook_attempt::{AttemptOutcome, ATTEMPT_DELIVERED};
use productflow_db::repositories::WebhookAttemptRepo;
use productflow_events::bus::WEBHOOK_ATTEMPT_RECORDED;
use productflow_events::PlatformEvent;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::query::{PaginationParams, RetryParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/products/{id}/webhook-attempts
///
/// Newest first. Supports `limit` and `offset`.
pub async fn list_attempts(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
    let offset = clamp_offset(params.offset);

    let attempts = WebhookAttemptRepo::list_for_product(&state.pool, product_id, limit, offset).await?;
    Ok(Json(DataResponse { data: attempts }))
}

/// POST /api/v1/webhook-attempts/{id}/retry
///
/// Re-send the stored payload to the stored URL. Answers 200 with the
/// updated attempt whether or not the engine accepted it; the outcome is
/// in the record.
///
/// An attempt that was already delivered answers 409 unless `?force=true`.
pub async fn retry_attempt(
    State(state): State<AppState>,
    Path(attempt_id): Path<DbId>,
    Query(params): Query<RetryParams>,
) -> AppResult<impl IntoResponse> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "WebhookAttempt",
            id: attempt_id.to_string(),
        })
    };

    let attempt = WebhookAttemptRepo::find_by_id(&state.pool, attempt_id)
        .await?
        .ok_or_else(not_found)?;

    if attempt.status == ATTEMPT_DELIVERED && !params.force {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Webhook attempt {attempt_id} was already delivered; pass force=true to re-send"
        ))));
    }

    let outcome = match state.webhooks.post_json(&attempt.url, &attempt.payload).await {
        Ok(reply) => AttemptOutcome::from_response(reply.status, &reply.body),
        Err(e) => {
            tracing::warn!(attempt_id, error = %e, "Webhook retry failed");
            AttemptOutcome::unreachable(&e)
        }
    };

    let updated = WebhookAttemptRepo::record_retry(&state.pool, attempt_id, &outcome)
        .await?
        .ok_or_else(not_found)?;

    tracing::info!(
        attempt_id,
        product_id = %updated.product_id,
        trigger_kind = %updated.trigger_kind,
        status = %updated.status,
        attempt_count = updated.attempt_count,
        "Webhook attempt retried",
    );
    state.event_bus.publish(
        PlatformEvent::new(WEBHOOK_ATTEMPT_RECORDED)
            .with_source("webhook_attempt", updated.id)
            .with_payload(json!({
                "product_id": updated.product_id,
                "trigger_kind": updated.trigger_kind,
                "status": updated.status,
            })),
    );

    Ok(Json(DataResponse { data: updated }))
}
