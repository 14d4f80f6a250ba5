//! Handlers for the `/products` resource.
//!
//! Writes publish `product.*` events so open dashboards can refresh.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use productflow_core::error::CoreError;
use productflow_core::types::ProductId;
use productflow_db::models::product::{CreateProduct, ProductListQuery, UpdateProduct};
use productflow_db::repositories::ProductRepo;
use productflow_events::bus::{PRODUCT_CREATED, PRODUCT_DELETED, PRODUCT_UPDATED};
use productflow_events::PlatformEvent;
use serde_json::{json, Value};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: ProductId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Product",
        id: id.to_string(),
    })
}

/// The column only accepts objects; reject anything else before the write.
fn ensure_object_metadata(metadata: Option<&Value>) -> AppResult<()> {
    match metadata {
        Some(m) if !m.is_object() => Err(AppError::Core(CoreError::Validation(
            "metadata must be a JSON object".into(),
        ))),
        _ => Ok(()),
    }
}

/// POST /api/v1/products
///
/// Returns 201 with the created product. Status defaults to `new`, which
/// the orchestrator picks up to start research.
pub async fn create_product(
    State(state): State<AppState>,
    input: Result<Json<CreateProduct>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = input?;
    input.validate()?;
    ensure_object_metadata(input.metadata.as_ref())?;

    let product = ProductRepo::create(&state.pool, &input).await?;

    tracing::info!(product_id = %product.id, user_id = %product.user_id, "Product created");
    state.event_bus.publish(
        PlatformEvent::new(PRODUCT_CREATED)
            .with_source("product", product.id)
            .with_payload(json!({ "status": product.status })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: product })))
}

/// GET /api/v1/products
///
/// Optional `user_id`, `status`, `limit` and `offset` query parameters.
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductListQuery>,
) -> AppResult<impl IntoResponse> {
    let products = ProductRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> AppResult<impl IntoResponse> {
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: product }))
}

/// PATCH /api/v1/products/{id}
///
/// `metadata` is merged into the stored document. With `expected_version`
/// set, a row that has moved on answers 409 instead of being overwritten.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    input: Result<Json<UpdateProduct>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = input?;
    input.validate()?;

    ensure_object_metadata(input.metadata.as_ref())?;

    let Some(product) = ProductRepo::update(&state.pool, id, &input).await? else {
        let Some(expected) = input.expected_version else {
            return Err(not_found(id));
        };
        if ProductRepo::find_by_id(&state.pool, id).await?.is_none() {
            return Err(not_found(id));
        }
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Product {id} is no longer at version {expected}"
        ))));
    };

    tracing::info!(product_id = %id, version = product.version, "Product updated");
    state.event_bus.publish(
        PlatformEvent::new(PRODUCT_UPDATED)
            .with_source("product", id)
            .with_payload(json!({ "status": product.status, "version": product.version })),
    );

    Ok(Json(DataResponse { data: product }))
}

/// DELETE /api/v1/products/{id}
///
/// Cascades to the product's automation runs and webhook attempts.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> AppResult<impl IntoResponse> {
    if !ProductRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(product_id = %id, "Product deleted");
    state
        .event_bus
        .publish(PlatformEvent::new(PRODUCT_DELETED).with_source("product", id));

    Ok(StatusCode::NO_CONTENT)
}
