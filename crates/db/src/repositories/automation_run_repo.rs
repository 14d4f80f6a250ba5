//! Repository for the `automation_runs` table.

use productflow_core::automation::RunStatus;
use productflow_core::types::ProductId;
use sqlx::PgPool;

use crate::models::automation_run::AutomationRun;

const COLUMNS: &str = "\
    id, product_id, automation_type, status, progress, message, \
    started_at, completed_at, created_at, updated_at";

pub struct AutomationRunRepo;

impl AutomationRunRepo {
    /// Start (or restart) the run for a product and automation type.
    ///
    /// Upserts on `uq_automation_runs_product_type`: the run is reset to
    /// `processing` with zero progress and a fresh `started_at`.
    pub async fn start(
        pool: &PgPool,
        product_id: ProductId,
        automation_type: &str,
    ) -> Result<AutomationRun, sqlx::Error> {
        let processing = RunStatus::Processing.as_str();
        let query = format!(
            "INSERT INTO automation_runs (product_id, automation_type, status, progress, started_at)
             VALUES ($1, $2, '{processing}', 0, NOW())
             ON CONFLICT ON CONSTRAINT uq_automation_runs_product_type DO UPDATE SET
                status = EXCLUDED.status,
                progress = 0,
                message = NULL,
                started_at = NOW(),
                completed_at = NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AutomationRun>(&query)
            .bind(product_id)
            .bind(automation_type)
            .fetch_one(pool)
            .await
    }

    /// Record progress reported by the engine.
    ///
    /// `terminal` stamps `completed_at`. Returns `None` if no run exists for
    /// the pair.
    pub async fn update_progress(
        pool: &PgPool,
        product_id: ProductId,
        automation_type: &str,
        status: Option<&str>,
        progress: Option<i16>,
        message: Option<&str>,
        terminal: bool,
    ) -> Result<Option<AutomationRun>, sqlx::Error> {
        let query = format!(
            "UPDATE automation_runs SET
                status = COALESCE($3, status),
                progress = COALESCE($4, progress),
                message = COALESCE($5, message),
                completed_at = CASE WHEN $6 THEN NOW() ELSE completed_at END
             WHERE product_id = $1 AND automation_type = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AutomationRun>(&query)
            .bind(product_id)
            .bind(automation_type)
            .bind(status)
            .bind(progress)
            .bind(message)
            .bind(terminal)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_product(
        pool: &PgPool,
        product_id: ProductId,
    ) -> Result<Vec<AutomationRun>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM automation_runs
             WHERE product_id = $1
             ORDER BY automation_type"
        );
        sqlx::query_as::<_, AutomationRun>(&query)
            .bind(product_id)
            .fetch_all(pool)
            .await
    }
}
