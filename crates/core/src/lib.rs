//! Domain types and pure decision logic for productflow.
//!
//! Nothing in this crate performs I/O. The database, HTTP and engine
//! crates build on these types:
//!
//! - [`status`]: product status values and the transition table.
//! - [`change_event`]: row-change envelopes and the orchestrator decision.
//! - [`payload`]: field resolution and outbound webhook payloads.
//! - [`proxy`]: dashboard-triggered webhook proxies.
//! - [`executions`]: the closed set of execution-management commands.
//! - [`automation`]: automation-run types, statuses and progress rules.

pub mod automation;
pub mod change_event;
pub mod error;
pub mod executions;
pub mod pagination;
pub mod payload;
pub mod proxy;
pub mod status;
pub mod types;
pub mod webhook;
