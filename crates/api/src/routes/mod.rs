//! HTTP route handlers.

pub mod beverages;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod reservoir;

use fulfillment::DispenserService;
use store::DispenserStore;

/// Shared application state accessible from all handlers.
pub struct AppState<S: DispenserStore> {
    pub service: DispenserService<S>,
}
