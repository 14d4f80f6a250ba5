use axum::routing::post;
use axum::Router;

use crate::error::method_not_allowed;
use crate::handlers::orchestrator;
use crate::state::AppState;

/// Routes mounted at `/orchestrator`.
///
/// ```text
/// POST   /product-status   -> handle_product_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/product-status",
        post(orchestrator::handle_product_status).fallback(method_not_allowed),
    )
}
