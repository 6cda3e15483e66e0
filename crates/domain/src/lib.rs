//! Domain layer for the beverage dispenser.
//!
//! This crate holds the rules of the system and performs no IO:
//! - Beverage catalog records and validation
//! - Order state machine (`InQueue → InProgress → Completed`)
//! - Reservoir ledger with strict check-and-debit
//! - Admission policy for new orders
//! - Queue progression (completion and FIFO promotion)

pub mod admission;
pub mod beverage;
pub mod error;
pub mod order;
pub mod queue;
pub mod reservoir;

pub use admission::{Admission, admit};
pub use beverage::{Beverage, BeveragePatch, NewBeverage};
pub use error::{ConfigurationError, FieldError, ValidationError};
pub use order::{
    CompleteOrder, DrinkSize, Order, OrderCandidate, OrderError, OrderStatus, PlaceOrder,
    PlaceOrderError, UnknownDrinkSize, UnknownStatus, Volume,
};
pub use queue::{Completion, advance, any_in_progress, next_in_line};
pub use reservoir::{DrinkSizeVolume, ReservoirSettings};
