//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod automation_run_repo;
pub mod product_repo;
pub mod webhook_attempt_repo;

pub use automation_run_repo::AutomationRunRepo;
pub use product_repo::ProductRepo;
pub use webhook_attempt_repo::WebhookAttemptRepo;
