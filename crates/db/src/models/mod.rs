//! Row structs and request DTOs, one module per table.

pub mod automation_run;
pub mod product;
pub mod webhook_attempt;
