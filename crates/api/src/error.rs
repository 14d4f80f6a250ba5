use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use productflow_core::error::CoreError;
use productflow_n8n::{N8nApiError, WebhookError};
use serde_json::{json, Map, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses
/// of the form `{ "error": ..., "code": ... }` plus variant-specific keys.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `productflow_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The route exists but does not accept this method.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The automation engine answered with a non-2xx status.
    ///
    /// Relayed to the caller with the same status code.
    #[error("Automation engine returned HTTP {status}")]
    Upstream { status: u16, body: Value },

    /// A failure the caller should see the message of (transport errors,
    /// orchestrator failures).
    #[error("Unexpected error: {0}")]
    Unexpected(String),

    /// An internal error with a human-readable message. Sanitized on output.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::Validation(errors.to_string()))
    }
}

impl From<WebhookError> for AppError {
    fn from(err: WebhookError) -> Self {
        AppError::Unexpected(err.to_string())
    }
}

impl From<N8nApiError> for AppError {
    fn from(err: N8nApiError) -> Self {
        match err {
            N8nApiError::ApiError { status, body } => AppError::Upstream { status, body },
            other => AppError::Unexpected(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut extra = Map::new();

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::MissingFields {
                    required,
                    missing,
                    received,
                } => {
                    extra.insert("required".into(), json!(required));
                    extra.insert("missing".into(), json!(missing));
                    extra.insert("received".into(), json!(received));
                    (StatusCode::BAD_REQUEST, "MISSING_FIELDS", core.to_string())
                }
                CoreError::UnknownAction { action, supported } => {
                    extra.insert("action".into(), json!(action));
                    extra.insert("supported".into(), json!(supported));
                    (StatusCode::BAD_REQUEST, "UNKNOWN_ACTION", core.to_string())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "METHOD_NOT_ALLOWED",
                "Method not allowed".to_string(),
            ),
            AppError::Upstream { status, body } => {
                tracing::warn!(status, "Relaying automation engine error");
                extra.insert("details".into(), body.clone());
                (
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                    "UPSTREAM_ERROR",
                    self.to_string(),
                )
            }
            AppError::Unexpected(msg) => {
                tracing::error!(error = %msg, "Unexpected error");
                extra.insert("message".into(), json!(msg));
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let mut body = Map::new();
        body.insert("error".into(), json!(message));
        body.insert("code".into(), json!(code));
        body.extend(extra);

        (status, axum::Json(Value::Object(body))).into_response()
    }
}

/// Fallback for routes that only accept some methods.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn undecodable_engine_reply_is_unexpected() {
        let decode = serde_json::from_str::<Vec<u8>>("{}").unwrap_err();
        let err = AppError::from(N8nApiError::Decode(decode));
        assert_matches!(err, AppError::Unexpected(ref msg) if msg.contains("Unexpected n8n response body"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn engine_status_errors_are_relayed() {
        let err = AppError::from(N8nApiError::ApiError {
            status: 404,
            body: json!({ "message": "not found" }),
        });
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
