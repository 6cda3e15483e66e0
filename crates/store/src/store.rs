use async_trait::async_trait;
use common::{BeverageId, OrderId};
use domain::{Admission, Beverage, Completion, Order, OrderError, ReservoirSettings, Volume};

use crate::{OrderQuery, Result};

/// A successfully admitted and persisted order.
#[derive(Debug, Clone, PartialEq)]
pub struct Admitted {
    /// The stored order with its assigned status.
    pub order: Order,

    /// Volume taken from the reservoir for this order.
    pub volume: Volume,

    /// Reservoir level after the debit.
    pub remaining: Volume,
}

/// Core trait for dispenser store implementations.
///
/// The store owns three kinds of records: the beverage catalog, the orders,
/// and the reservoir settings singleton. Every operation that touches the
/// reservoir or the in-progress slot runs inside the store's serialization
/// point, so a read-check-write sequence can never interleave with another
/// admission or completion.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait DispenserStore: Send + Sync {
    /// Adds a beverage to the catalog.
    ///
    /// Fails with `DuplicateBeverageName` if the name is taken.
    async fn insert_beverage(&self, beverage: Beverage) -> Result<Beverage>;

    /// Retrieves a beverage by id.
    async fn get_beverage(&self, id: BeverageId) -> Result<Option<Beverage>>;

    /// Retrieves all beverages, oldest first.
    async fn list_beverages(&self) -> Result<Vec<Beverage>>;

    /// Replaces a stored beverage.
    ///
    /// Returns None if no beverage has that id. Fails with
    /// `DuplicateBeverageName` if the new name belongs to another beverage.
    async fn update_beverage(&self, beverage: Beverage) -> Result<Option<Beverage>>;

    /// Removes a beverage. Returns false if it did not exist.
    async fn delete_beverage(&self, id: BeverageId) -> Result<bool>;

    /// Reads the current reservoir settings.
    async fn load_settings(&self) -> Result<Option<ReservoirSettings>>;

    /// Writes the settings singleton if none exists yet.
    ///
    /// Returns true if the settings were written. Existing settings are never
    /// overwritten, so this cannot refill the reservoir.
    async fn provision_settings(&self, settings: ReservoirSettings) -> Result<bool>;

    /// Retrieves an order by id.
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>>;

    /// Retrieves orders matching a query, in creation order.
    async fn query_orders(&self, query: OrderQuery) -> Result<Vec<Order>>;

    /// Admits a new order as one indivisible step.
    ///
    /// `decide` receives a working copy of the settings and whether an order
    /// is currently in progress. If it returns an admission, the debited
    /// settings and the new order are committed together; if it returns an
    /// error, nothing is written and the error comes back as `Rejected`.
    async fn admit_order<F>(&self, decide: F) -> Result<Admitted>
    where
        F: FnOnce(&mut ReservoirSettings, bool) -> std::result::Result<Admission, OrderError>
            + Send;

    /// Completes an in-progress order and promotes the next queued one,
    /// as one indivisible step.
    ///
    /// Fails with `OrderNotFound` if the id is unknown and with
    /// `Rejected(NotInProgress)` if the order is not in progress.
    async fn complete_order(&self, id: OrderId) -> Result<Completion>;
}

/// Extension trait providing convenience methods for dispenser stores.
#[async_trait]
pub trait DispenserStoreExt: DispenserStore {
    /// Retrieves every order, in creation order.
    async fn list_orders(&self) -> Result<Vec<Order>> {
        self.query_orders(OrderQuery::new()).await
    }

    /// Returns the order currently at the dispenser, if any.
    async fn current_order(&self) -> Result<Option<Order>> {
        let mut orders = self
            .query_orders(OrderQuery::with_status(domain::OrderStatus::InProgress).limit(1))
            .await?;
        Ok(orders.pop())
    }
}

// Blanket implementation for all DispenserStore implementations
impl<T: DispenserStore + ?Sized> DispenserStoreExt for T {}
