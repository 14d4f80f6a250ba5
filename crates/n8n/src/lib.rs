//! HTTP clients for the n8n automation engine.
//!
//! - [`webhook`]: JSON POSTs to the engine's fixed webhook URLs, with the
//!   reply body normalised to JSON.
//! - [`api`]: the engine's REST API for inspecting and stopping
//!   executions, authenticated with a static API key.
//!
//! Both are exposed through `async_trait` seams ([`WebhookDispatch`],
//! [`ExecutionControl`]) so callers can substitute fakes in tests.

pub mod api;
pub mod webhook;

pub use api::{ExecutionControl, N8nApi, N8nApiError};
pub use webhook::{WebhookClient, WebhookDispatch, WebhookError, WebhookReply};
