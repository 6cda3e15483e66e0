//! Admission policy for new drink orders.
//!
//! Admission runs in a fixed order, and each step may reject:
//! 1. the beverage type must be on the allow-list (empty list allows all),
//! 2. the reservoir must keep a positive remainder after the drink,
//! 3. the drink's volume is debited,
//! 4. the order starts `InProgress` if the dispenser is idle, else `InQueue`.
//!
//! The policy itself is pure. Stores call it from inside their
//! serialization point so that steps 2-4 cannot interleave with another
//! admission or completion.

use chrono::{DateTime, Utc};

use crate::beverage::Beverage;
use crate::order::{Order, OrderCandidate, OrderError, OrderStatus, Volume};
use crate::reservoir::ReservoirSettings;

/// Outcome of a successful admission.
#[derive(Debug, Clone, PartialEq)]
pub struct Admission {
    /// The order with its computed initial status, not yet persisted.
    pub order: Order,

    /// Volume taken from the reservoir.
    pub volume: Volume,
}

/// Decides whether a candidate order may enter the queue.
///
/// On success `settings` has been debited; on rejection it is unchanged.
pub fn admit(
    settings: &mut ReservoirSettings,
    candidate: OrderCandidate,
    beverage: &Beverage,
    in_progress_exists: bool,
    now: DateTime<Utc>,
) -> Result<Admission, OrderError> {
    check_beverage_type(settings, beverage)?;

    let volume = settings.try_debit(candidate.size)?;

    let status = OrderStatus::initial(in_progress_exists);
    let order = Order::admitted(
        candidate.customer,
        candidate.beverage_id,
        candidate.size,
        status,
        now,
    );

    Ok(Admission { order, volume })
}

/// Rejects beverages whose type is not on a non-empty allow-list.
pub fn check_beverage_type(
    settings: &ReservoirSettings,
    beverage: &Beverage,
) -> Result<(), OrderError> {
    if settings.allows_type(&beverage.beverage_type) {
        Ok(())
    } else {
        Err(OrderError::TypeNotAllowed {
            allowed: settings.allowed_types().to_vec(),
        })
    }
}
