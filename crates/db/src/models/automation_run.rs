//! Automation-run model and DTOs.

use productflow_core::types::{DbId, ProductId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `automation_runs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AutomationRun {
    pub id: DbId,
    pub product_id: ProductId,
    pub automation_type: String,
    pub status: String,
    pub progress: i16,
    pub message: Option<String>,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `PATCH /api/v1/products/{id}/automation-runs/{type}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAutomationRun {
    pub status: Option<String>,
    pub progress: Option<i32>,
    pub message: Option<String>,
}
