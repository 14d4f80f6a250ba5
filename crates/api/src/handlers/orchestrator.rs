//! Handler for the change-event webhook that drives status transitions.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use productflow_core::change_event::ChangeEvent;

use crate::config::OrchestratorMode;
use crate::engine::{FanOut, Orchestrator, OrchestratorOutcome, PgProductStore};
use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/orchestrator/product-status
///
/// Receives one `{type, table, record, old_record?}` envelope per row
/// change. See [`Orchestrator`] for the rules.
pub async fn handle_product_status(
    State(state): State<AppState>,
    event: Result<Json<ChangeEvent>, JsonRejection>,
) -> AppResult<Json<OrchestratorOutcome>> {
    let Json(event) = event?;

    let store = PgProductStore::new(state.pool.clone());
    let fan_out = match state.config.orchestrator_mode {
        OrchestratorMode::Live => Some(FanOut {
            dispatch: state.webhooks.as_ref(),
            urls: &state.config.n8n.webhook_urls,
        }),
        OrchestratorMode::Offline => None,
    };

    let outcome = Orchestrator::new(&store, fan_out, &state.event_bus)
        .handle(&event)
        .await?;

    tracing::info!(
        product_id = ?outcome.product_id,
        status = ?outcome.status,
        triggers = outcome.triggers.len(),
        "Change event handled",
    );
    Ok(Json(outcome))
}
