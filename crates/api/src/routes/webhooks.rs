//! Route definitions for the dashboard webhook proxies.

use axum::routing::post;
use axum::Router;

use crate::error::method_not_allowed;
use crate::handlers::proxy;
use crate::state::AppState;

/// Routes mounted at `/webhooks`. POST only; other methods answer 405.
///
/// ```text
/// POST   /banner-generation   -> trigger_banner_generation
/// POST   /reviews             -> trigger_reviews
/// POST   /ugc-scripts         -> trigger_ugc_scripts
/// POST   /shopify-deploy      -> trigger_shopify_deploy
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/banner-generation",
            post(proxy::trigger_banner_generation).fallback(method_not_allowed),
        )
        .route(
            "/reviews",
            post(proxy::trigger_reviews).fallback(method_not_allowed),
        )
        .route(
            "/ugc-scripts",
            post(proxy::trigger_ugc_scripts).fallback(method_not_allowed),
        )
        .route(
            "/shopify-deploy",
            post(proxy::trigger_shopify_deploy).fallback(method_not_allowed),
        )
}
