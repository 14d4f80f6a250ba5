//! Repository for the `products` table.

use productflow_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use productflow_core::status::STATUS_NEW;
use productflow_core::types::ProductId;
use sqlx::PgPool;

use crate::models::product::{CreateProduct, Product, ProductListQuery, UpdateProduct};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, user_id, name, description, status, niche, country, language, gender, \
    amazon_link, alibaba_link, metadata, version, created_at, updated_at";

/// Provides CRUD and status-transition operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new product. Status defaults to `new`, metadata to `{}`.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products
                (user_id, name, description, status, niche, country, language, gender,
                 amazon_link, alibaba_link, metadata)
             VALUES ($1, $2, $3, COALESCE($4, '{STATUS_NEW}'), $5, $6, $7, $8, $9, $10,
                     COALESCE($11, '{{}}'::jsonb))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(input.user_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .bind(&input.niche)
            .bind(&input.country)
            .bind(&input.language)
            .bind(&input.gender)
            .bind(&input.amazon_link)
            .bind(&input.alibaba_link)
            .bind(&input.metadata)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: ProductId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List products, newest first, optionally filtered by owner and status.
    pub async fn list(pool: &PgPool, params: &ProductListQuery) -> Result<Vec<Product>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(params.offset);
        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE ($1::uuid IS NULL OR user_id = $1)
               AND ($2::text IS NULL OR status = $2)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(params.user_id)
            .bind(&params.status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update.
    ///
    /// Only non-`None` fields are written; `metadata` is merged with `||`.
    /// Returns `None` when the row does not exist or, if
    /// `expected_version` is set, when the row has moved past it.
    pub async fn update(
        pool: &PgPool,
        id: ProductId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                niche = COALESCE($5, niche),
                country = COALESCE($6, country),
                language = COALESCE($7, language),
                gender = COALESCE($8, gender),
                amazon_link = COALESCE($9, amazon_link),
                alibaba_link = COALESCE($10, alibaba_link),
                metadata = metadata || COALESCE($11, '{{}}'::jsonb),
                version = version + 1
             WHERE id = $1
               AND ($12::int IS NULL OR version = $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .bind(&input.niche)
            .bind(&input.country)
            .bind(&input.language)
            .bind(&input.gender)
            .bind(&input.amazon_link)
            .bind(&input.alibaba_link)
            .bind(&input.metadata)
            .bind(input.expected_version)
            .fetch_optional(pool)
            .await
    }

    /// Compare-and-set the status and merge `metadata_patch` in one statement.
    ///
    /// Applies only while the row still has status `from`; returns `None`
    /// otherwise (including when the row is gone). Keys outside the patch
    /// are left untouched.
    pub async fn advance_status(
        pool: &PgPool,
        id: ProductId,
        from: &str,
        to: &str,
        metadata_patch: &serde_json::Value,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET
                status = $3,
                metadata = metadata || $4::jsonb,
                version = version + 1
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .bind(metadata_patch)
            .fetch_optional(pool)
            .await
    }

    /// Delete a product. Cascades to its automation runs and attempts.
    pub async fn delete(pool: &PgPool, id: ProductId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
