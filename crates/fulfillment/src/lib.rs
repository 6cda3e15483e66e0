//! Dispenser operations on top of a [`store::DispenserStore`].
//!
//! Placing an order follows these steps:
//! 1. Validate the request fields
//! 2. Resolve the beverage from the catalog
//! 3. Admit the order inside the store (type check, reservoir debit, initial status)
//!
//! Completing an order serves the one at the dispenser and promotes the
//! longest-waiting queued order in the same step.

pub mod error;
pub mod service;

pub use error::{Result, ServiceError};
pub use service::{DispenserService, PlacedOrder};
