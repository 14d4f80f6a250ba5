//! Handlers for `/products/{id}/automation-runs`.
//!
//! One run per (product, automation type). The engine starts a run with
//! `PUT` and reports progress with `PATCH`; dashboards read the list.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use productflow_core::automation::{validate_progress, AutomationType, RunStatus};
use productflow_core::error::CoreError;
use productflow_core::types::ProductId;
use productflow_db::models::automation_run::{AutomationRun, UpdateAutomationRun};
use productflow_db::repositories::{AutomationRunRepo, ProductRepo};
use productflow_events::bus::AUTOMATION_RUN_UPDATED;
use productflow_events::PlatformEvent;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn publish(state: &AppState, run: &AutomationRun) {
    state.event_bus.publish(
        PlatformEvent::new(AUTOMATION_RUN_UPDATED)
            .with_source("automation_run", run.id)
            .with_payload(json!({
                "product_id": run.product_id,
                "automation_type": run.automation_type,
                "status": run.status,
                "progress": run.progress,
            })),
    );
}

/// PUT /api/v1/products/{id}/automation-runs/{type}
///
/// Start or restart a run: `processing`, progress 0, fresh `started_at`.
pub async fn start_run(
    State(state): State<AppState>,
    Path((product_id, automation_type)): Path<(ProductId, String)>,
) -> AppResult<impl IntoResponse> {
    let automation_type = AutomationType::parse(&automation_type)?;

    if ProductRepo::find_by_id(&state.pool, product_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id: product_id.to_string(),
        }));
    }

    let run = AutomationRunRepo::start(&state.pool, product_id, automation_type.as_str()).await?;

    tracing::info!(
        %product_id,
        automation_type = automation_type.as_str(),
        run_id = run.id,
        "Automation run started",
    );
    publish(&state, &run);

    Ok(Json(DataResponse { data: run }))
}

/// PATCH /api/v1/products/{id}/automation-runs/{type}
///
/// Progress report. A terminal status stamps `completed_at`.
pub async fn update_run(
    State(state): State<AppState>,
    Path((product_id, automation_type)): Path<(ProductId, String)>,
    input: Result<Json<UpdateAutomationRun>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = input?;
    let automation_type = AutomationType::parse(&automation_type)?;
    let status = input.status.as_deref().map(RunStatus::parse).transpose()?;
    let progress = input.progress.map(validate_progress).transpose()?;

    let run = AutomationRunRepo::update_progress(
        &state.pool,
        product_id,
        automation_type.as_str(),
        status.map(RunStatus::as_str),
        progress,
        input.message.as_deref(),
        status.is_some_and(RunStatus::is_terminal),
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "AutomationRun",
            id: format!("{product_id}/{}", automation_type.as_str()),
        })
    })?;

    tracing::debug!(
        %product_id,
        automation_type = automation_type.as_str(),
        status = %run.status,
        progress = run.progress,
        "Automation run progress",
    );
    publish(&state, &run);

    Ok(Json(DataResponse { data: run }))
}

/// GET /api/v1/products/{id}/automation-runs
pub async fn list_runs(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> AppResult<impl IntoResponse> {
    let runs = AutomationRunRepo::list_for_product(&state.pool, product_id).await?;
    Ok(Json(DataResponse { data: runs }))
}
