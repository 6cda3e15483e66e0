//! Shared identifier types for the dispenser workspace.

mod types;

pub use types::{BeverageId, OrderId};
