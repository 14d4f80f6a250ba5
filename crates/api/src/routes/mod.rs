pub mod executions;
pub mod health;
pub mod orchestrator;
pub mod products;
pub mod webhooks;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /orchestrator/product-status                  change events (POST)
///
/// /webhooks/banner-generation                   dashboard proxies (POST)
/// /webhooks/reviews
/// /webhooks/ugc-scripts
/// /webhooks/shopify-deploy
///
/// /executions                                   stop, status, resume, list-running (POST)
///
/// /products                                     list, create
/// /products/{id}                                get, update, delete
/// /products/{id}/automation-runs                list
/// /products/{id}/automation-runs/{type}         start (PUT), progress (PATCH)
/// /products/{id}/webhook-attempts               list
///
/// /webhook-attempts/{id}/retry                  re-send (POST, ?force=true for delivered)
///
/// /events                                       server-sent events (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/orchestrator", orchestrator::router())
        .nest("/webhooks", webhooks::router())
        .nest("/executions", executions::router())
        .nest("/products", products::router())
        .route(
            "/webhook-attempts/{id}/retry",
            post(handlers::webhook_attempts::retry_attempt),
        )
        .route("/events", get(handlers::events::stream_events))
}
