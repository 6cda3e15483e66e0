//! Queue progression for the single-lane dispenser.

use common::OrderId;

use crate::order::{Order, OrderError, OrderStatus};

/// Result of completing the order at the dispenser.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// The order that was just served.
    pub completed: Order,

    /// The queued order promoted to the dispenser, if any was waiting.
    pub promoted: Option<Order>,
}

/// Picks the queued order that has waited longest.
///
/// Orders are compared by admission time. Among equal timestamps the one
/// that comes first in `orders` wins, so callers pass orders in creation
/// order.
pub fn next_in_line<'a, I>(orders: I) -> Option<&'a Order>
where
    I: IntoIterator<Item = &'a Order>,
{
    orders
        .into_iter()
        .filter(|order| order.status() == OrderStatus::InQueue)
        .min_by_key(|order| order.created_at())
}

/// Returns true if some order currently holds the dispenser.
pub fn any_in_progress<'a, I>(orders: I) -> bool
where
    I: IntoIterator<Item = &'a Order>,
{
    orders
        .into_iter()
        .any(|order| order.status() == OrderStatus::InProgress)
}

/// Completes `order_id` and promotes the next queued order.
///
/// `orders` must be in creation order. Returns `Ok(None)` if no order has
/// that id. Nothing is modified when an error is returned.
pub fn advance(orders: &mut [Order], order_id: OrderId) -> Result<Option<Completion>, OrderError> {
    let Some(target) = orders.iter().position(|o| o.id() == order_id) else {
        return Ok(None);
    };

    orders[target].complete()?;
    let completed = orders[target].clone();

    let next = next_in_line(orders.iter())
        .map(Order::id)
        .and_then(|id| orders.iter().position(|o| o.id() == id));
    let promoted = match next {
        Some(index) => {
            orders[index].promote()?;
            Some(orders[index].clone())
        }
        None => None,
    };

    Ok(Some(Completion {
        completed,
        promoted,
    }))
}
