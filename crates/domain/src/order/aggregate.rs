//! Order record and its status transitions.

use chrono::{DateTime, Utc};
use common::{BeverageId, OrderId};
use serde::{Deserialize, Serialize};

use super::{DrinkSize, OrderError, OrderStatus};

/// A drink order.
///
/// Customer, beverage and size are fixed at admission. The status only
/// changes through [`Order::promote`] and [`Order::complete`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    customer: String,
    beverage_id: BeverageId,
    size: DrinkSize,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Creates a newly admitted order with the status the queue assigned it.
    pub fn admitted(
        customer: impl Into<String>,
        beverage_id: BeverageId,
        size: DrinkSize,
        status: OrderStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: OrderId::new(),
            customer: customer.into(),
            beverage_id,
            size,
            status,
            created_at,
        }
    }

    /// Rebuilds an order from storage.
    pub fn restore(
        id: OrderId,
        customer: String,
        beverage_id: BeverageId,
        size: DrinkSize,
        status: OrderStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            customer,
            beverage_id,
            size,
            status,
            created_at,
        }
    }
}

// Query methods
impl Order {
    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn beverage_id(&self) -> BeverageId {
        self.beverage_id
    }

    pub fn size(&self) -> DrinkSize {
        self.size
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Admission time, used as the FIFO key of the queue.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// Transitions
impl Order {
    /// Moves a queued order to the dispenser.
    pub fn promote(&mut self) -> Result<(), OrderError> {
        if !self.status.can_promote() {
            return Err(OrderError::InvalidStateTransition {
                current: self.status,
                action: "promote",
            });
        }
        self.status = OrderStatus::InProgress;
        Ok(())
    }

    /// Marks the order currently at the dispenser as served.
    pub fn complete(&mut self) -> Result<(), OrderError> {
        if !self.status.can_complete() {
            return Err(OrderError::NotInProgress { order_id: self.id });
        }
        self.status = OrderStatus::Completed;
        Ok(())
    }
}
