//! Persistence seam for the orchestrator.

use async_trait::async_trait;
use productflow_core::types::{DbId, ProductId};
use productflow_db::models::product::Product;
use productflow_db::models::webhook_attempt::NewWebhookAttempt;
use productflow_db::repositories::{ProductRepo, WebhookAttemptRepo};
use productflow_db::DbPool;
use serde_json::Value;

/// The two writes the orchestrator makes.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Compare-and-set `from -> to`, merging `metadata_patch`.
    ///
    /// `None` when the row is gone or no longer has status `from`.
    async fn advance_status(
        &self,
        id: ProductId,
        from: &str,
        to: &str,
        metadata_patch: &Value,
    ) -> Result<Option<Product>, sqlx::Error>;

    /// Persist one webhook attempt and return its id.
    async fn record_attempt(&self, attempt: &NewWebhookAttempt) -> Result<DbId, sqlx::Error>;
}

/// [`ProductStore`] backed by the Postgres repositories.
#[derive(Clone)]
pub struct PgProductStore {
    pool: DbPool,
}

impl PgProductStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn advance_status(
        &self,
        id: ProductId,
        from: &str,
        to: &str,
        metadata_patch: &Value,
    ) -> Result<Option<Product>, sqlx::Error> {
        ProductRepo::advance_status(&self.pool, id, from, to, metadata_patch).await
    }

    async fn record_attempt(&self, attempt: &NewWebhookAttempt) -> Result<DbId, sqlx::Error> {
        let row = WebhookAttemptRepo::record(&self.pool, attempt).await?;
        Ok(row.id)
    }
}
