//! Product entity model and DTOs.

use productflow_core::types::{ProductId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub niche: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub gender: Option<String>,
    pub amazon_link: Option<String>,
    pub alibaba_link: Option<String>,
    pub metadata: serde_json::Value,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /api/v1/products`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProduct {
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    /// Defaults to `new`, which starts the research workflow.
    #[validate(length(min = 1, max = 64))]
    pub status: Option<String>,
    pub niche: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub gender: Option<String>,
    #[validate(url)]
    pub amazon_link: Option<String>,
    #[validate(url)]
    pub alibaba_link: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// DTO for `PATCH /api/v1/products/{id}`.
///
/// `metadata` is merged into the stored document, not substituted for it.
/// When `expected_version` is set the update only applies if the row is
/// still at that version.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub status: Option<String>,
    pub niche: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub gender: Option<String>,
    #[validate(url)]
    pub amazon_link: Option<String>,
    #[validate(url)]
    pub alibaba_link: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub expected_version: Option<i32>,
}

/// Query parameters for `GET /api/v1/products`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub user_id: Option<Uuid>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
