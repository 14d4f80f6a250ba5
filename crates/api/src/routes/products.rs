//! Route definitions for products and their per-product sub-resources.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{automation_runs, products, webhook_attempts};
use crate::state::AppState;

/// Routes mounted at `/products`.
///
/// ```text
/// GET    /                              -> list_products
/// POST   /                              -> create_product
/// GET    /{id}                          -> get_product
/// PATCH  /{id}                          -> update_product
/// DELETE /{id}                          -> delete_product
/// GET    /{id}/automation-runs          -> list_runs
/// PUT    /{id}/automation-runs/{type}   -> start_run
/// PATCH  /{id}/automation-runs/{type}   -> update_run
/// GET    /{id}/webhook-attempts         -> list_attempts
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list_products).post(products::create_product))
        .route(
            "/{id}",
            get(products::get_product)
                .patch(products::update_product)
                .delete(products::delete_product),
        )
        .route("/{id}/automation-runs", get(automation_runs::list_runs))
        .route(
            "/{id}/automation-runs/{automation_type}",
            put(automation_runs::start_run).patch(automation_runs::update_run),
        )
        .route("/{id}/webhook-attempts", get(webhook_attempts::list_attempts))
}
