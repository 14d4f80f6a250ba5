use axum::routing::post;
use axum::Router;

use crate::error::method_not_allowed;
use crate::handlers::executions;
use crate::state::AppState;

/// Routes mounted at `/executions`.
///
/// ```text
/// POST   /    -> manage_execution
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        post(executions::manage_execution).fallback(method_not_allowed),
    )
}
