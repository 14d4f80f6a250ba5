//! Status orchestration engine.
//!
//! Turns one row-change event into a status write plus the webhook fan-out
//! that follows it. The persistence and HTTP seams are traits so the
//! decision and failure-containment rules can be tested without a
//! database or a live engine.

pub mod orchestrator;
pub mod store;

pub use orchestrator::{FanOut, Orchestrator, OrchestratorOutcome, TriggerSummary};
pub use store::{PgProductStore, ProductStore};
