//! Handlers for the dashboard webhook proxies under `/webhooks`.
//!
//! Each endpoint validates the product body, fills in defaults, and makes
//! exactly one POST to the engine. Nothing is retried here.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use productflow_core::proxy::ProxyKind;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::handlers::reply_data;
use crate::state::AppState;

async fn forward(
    state: &AppState,
    kind: ProxyKind,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(body) = body?;
    let payload = kind.build_payload(&body, Utc::now())?;

    let webhook = kind.webhook();
    let url = state.config.n8n.webhook_urls.url(webhook);
    tracing::info!(
        webhook = %webhook,
        product_id = %payload["product_id"],
        "Forwarding dashboard trigger",
    );

    let reply = state.webhooks.post_json(url, &payload).await?;
    let data = reply_data(reply)?;

    Ok(Json(json!({
        "success": true,
        "automation_type": kind.automation_type().as_str(),
        "data": data,
    })))
}

/// POST /api/v1/webhooks/banner-generation
pub async fn trigger_banner_generation(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    forward(&state, ProxyKind::BannerGeneration, body).await
}

/// POST /api/v1/webhooks/reviews
pub async fn trigger_reviews(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    forward(&state, ProxyKind::Reviews, body).await
}

/// POST /api/v1/webhooks/ugc-scripts
pub async fn trigger_ugc_scripts(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    forward(&state, ProxyKind::UgcScripts, body).await
}

/// POST /api/v1/webhooks/shopify-deploy
///
/// Requires `store` in addition to the base fields.
pub async fn trigger_shopify_deploy(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    forward(&state, ProxyKind::ShopifyDeployment, body).await
}
