//! Drink orders and their lifecycle.

mod aggregate;
mod commands;
mod state;
mod value_objects;

pub use aggregate::Order;
pub use commands::{CompleteOrder, OrderCandidate, PlaceOrder, PlaceOrderError};
pub use state::{OrderStatus, UnknownStatus};
pub use value_objects::{DrinkSize, UnknownDrinkSize, Volume};

use common::OrderId;
use thiserror::Error;

use crate::error::ConfigurationError;

/// Errors raised by admission and queue progression rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// The beverage's type is not on the allow-list.
    #[error("Can only create orders for beverages of the following type: {}", .allowed.join(", "))]
    TypeNotAllowed { allowed: Vec<String> },

    /// The reservoir would be drained to zero or below.
    #[error("Not enough water in the reservoir for your order")]
    InsufficientReservoir,

    /// Completion was requested for an order that is not at the dispenser.
    #[error("No order in progress found with id {order_id}")]
    NotInProgress { order_id: OrderId },

    /// Order is not in the expected status.
    #[error("Invalid state transition: cannot {action} from {current} state")]
    InvalidStateTransition {
        current: OrderStatus,
        action: &'static str,
    },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl OrderError {
    /// Short label used for metrics and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            OrderError::TypeNotAllowed { .. } => "type_not_allowed",
            OrderError::InsufficientReservoir => "insufficient_reservoir",
            OrderError::NotInProgress { .. } => "not_in_progress",
            OrderError::InvalidStateTransition { .. } => "invalid_transition",
            OrderError::Configuration(_) => "configuration",
        }
    }
}
