//! In-process event bus for productflow.
//!
//! Handlers publish a [`PlatformEvent`] whenever they change a product,
//! an automation run or a webhook attempt. The API streams the bus to
//! dashboards so they can follow status changes live.

pub mod bus;

pub use bus::{EventBus, PlatformEvent};
