use std::sync::Arc;

use productflow_n8n::{ExecutionControl, WebhookDispatch};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: productflow_db::DbPool,
    /// Server configuration, including the engine's webhook URLs.
    pub config: Arc<ServerConfig>,
    /// Outbound webhook POSTs to the automation engine.
    pub webhooks: Arc<dyn WebhookDispatch>,
    /// The engine's execution REST API.
    pub executions: Arc<dyn ExecutionControl>,
    /// Centralized event bus for publishing platform events.
    pub event_bus: Arc<productflow_events::EventBus>,
}
