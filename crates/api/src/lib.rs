//! HTTP surface of productflow: the status orchestrator, the dashboard
//! webhook proxies, execution management, and CRUD over products,
//! automation runs and the webhook outbox.

pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
