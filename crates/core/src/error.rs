#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// One or more required request fields were absent or blank.
    #[error("Missing required fields: {}", .missing.join(", "))]
    MissingFields {
        required: Vec<String>,
        missing: Vec<String>,
        received: Vec<String>,
    },

    #[error("Unknown action: {action}")]
    UnknownAction {
        action: String,
        supported: Vec<&'static str>,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
