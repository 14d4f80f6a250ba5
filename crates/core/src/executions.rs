//! Execution-management commands.
//!
//! The dashboard sends a single request shape with an `action` string.
//! [`ExecutionCommand::from_request`] turns it into a closed set of
//! commands, each carrying exactly the parameters it needs, so the HTTP
//! layer can match exhaustively instead of comparing strings.

use serde_json::Value;

use crate::error::CoreError;
use crate::payload::{id_string, ProductFields};

pub const DEFAULT_LIST_LIMIT: u32 = 20;
pub const MAX_LIST_LIMIT: u32 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionAction {
    Stop,
    Status,
    Resume,
    ListRunning,
}

impl ExecutionAction {
    pub const ALL: [ExecutionAction; 4] = [
        ExecutionAction::Stop,
        ExecutionAction::Status,
        ExecutionAction::Resume,
        ExecutionAction::ListRunning,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionAction::Stop => "stop",
            ExecutionAction::Status => "status",
            ExecutionAction::Resume => "resume",
            ExecutionAction::ListRunning => "list-running",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == value)
    }

    /// Parameters the action needs besides `action` itself.
    pub fn required_params(self) -> &'static [&'static str] {
        match self {
            ExecutionAction::Stop | ExecutionAction::Status => &["action", "execution_id"],
            ExecutionAction::Resume => &["action", "product_id", "product"],
            ExecutionAction::ListRunning => &["action"],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionCommand {
    Stop { execution_id: String },
    Status { execution_id: String },
    Resume { product_id: String, product: Value },
    ListRunning { limit: u32 },
}

impl ExecutionCommand {
    pub fn action(&self) -> ExecutionAction {
        match self {
            ExecutionCommand::Stop { .. } => ExecutionAction::Stop,
            ExecutionCommand::Status { .. } => ExecutionAction::Status,
            ExecutionCommand::Resume { .. } => ExecutionAction::Resume,
            ExecutionCommand::ListRunning { .. } => ExecutionAction::ListRunning,
        }
    }

    /// Validate a raw request body into a command.
    pub fn from_request(body: &Value) -> Result<Self, CoreError> {
        let fields = ProductFields::new(body)
            .ok_or_else(|| CoreError::Validation("Request body must be a JSON object".into()))?;
        fields.require(&["action"])?;

        let raw_action = fields.text("action").unwrap_or_default();
        let action = ExecutionAction::parse(raw_action).ok_or_else(|| CoreError::UnknownAction {
            action: raw_action.to_string(),
            supported: ExecutionAction::ALL.map(|a| a.as_str()).to_vec(),
        })?;
        fields.require(action.required_params())?;

        Ok(match action {
            ExecutionAction::Stop => ExecutionCommand::Stop {
                execution_id: execution_id(body)?,
            },
            ExecutionAction::Status => ExecutionCommand::Status {
                execution_id: execution_id(body)?,
            },
            ExecutionAction::Resume => {
                let product = body["product"].clone();
                if !product.is_object() {
                    return Err(CoreError::Validation("product must be a JSON object".into()));
                }
                ExecutionCommand::Resume {
                    product_id: required_id(body, "product_id")?,
                    product,
                }
            }
            ExecutionAction::ListRunning => ExecutionCommand::ListRunning {
                limit: body
                    .get("limit")
                    .and_then(Value::as_u64)
                    .map(|n| n.clamp(1, MAX_LIST_LIMIT as u64) as u32)
                    .unwrap_or(DEFAULT_LIST_LIMIT),
            },
        })
    }
}

fn required_id(body: &Value, key: &str) -> Result<String, CoreError> {
    id_string(body.get(key))
        .ok_or_else(|| CoreError::Validation(format!("{key} must be a string or number")))
}

/// Execution ids end up as a path segment on the engine's REST API, so only
/// `[A-Za-z0-9_-]` is accepted.
fn execution_id(body: &Value) -> Result<String, CoreError> {
    let id = required_id(body, "execution_id")?;
    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(CoreError::Validation(
            "execution_id may only contain letters, digits, '_' and '-'".into(),
        ));
    }
    Ok(id)
}
