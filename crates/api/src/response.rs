//! Shared response envelope types for API handlers.
//!
//! Resource endpoints (products, automation runs, webhook attempts) answer
//! with a `{ "data": ... }` envelope. The orchestrator, proxy and execution
//! endpoints keep the `{ "success": true, ... }` shape the dashboard reads.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
