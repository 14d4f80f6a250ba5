//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped with `clamp_limit` / `clamp_offset` before they reach
/// a query.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?force=` on the webhook-attempt retry endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct RetryParams {
    #[serde(default)]
    pub force: bool,
}
