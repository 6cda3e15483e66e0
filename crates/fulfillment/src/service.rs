//! Dispenser service providing the operations behind the HTTP API.

use std::time::Instant;

use chrono::Utc;
use common::{BeverageId, OrderId};
use domain::{
    Beverage, BeveragePatch, CompleteOrder, Completion, ConfigurationError, NewBeverage, Order,
    OrderError, PlaceOrder, ReservoirSettings, Volume, admit,
};
use store::{DispenserStore, OrderQuery};

use crate::error::{Result, ServiceError};

/// An admitted order together with what the caller needs to describe it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub order: Order,
    pub beverage: Beverage,
    /// Reservoir level after this order's volume was taken.
    pub remaining: Volume,
}

/// Service for managing the dispenser.
///
/// Validation and catalog lookups happen here; the admission decision itself
/// runs inside the store's serialization point.
pub struct DispenserService<S: DispenserStore> {
    store: S,
}

impl<S: DispenserStore> DispenserService<S> {
    /// Creates a new service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Writes the startup settings unless the store already has some.
    #[tracing::instrument(skip(self, settings), fields(remaining = %settings.remaining()))]
    pub async fn seed_settings(&self, settings: ReservoirSettings) -> Result<bool> {
        let remaining = settings.remaining();
        let written = self.store.provision_settings(settings).await?;
        if written {
            metrics::gauge!("reservoir_remaining").set(remaining.amount() as f64);
            tracing::info!("reservoir settings seeded");
        } else {
            tracing::info!("reservoir settings already present, keeping stored values");
        }
        Ok(written)
    }

    /// Places a new order.
    ///
    /// On success the reservoir has been debited and the order is either at
    /// the dispenser or in the queue. On any error nothing was written.
    #[tracing::instrument(skip(self, cmd))]
    pub async fn place_order(&self, cmd: PlaceOrder) -> Result<PlacedOrder> {
        let start = Instant::now();
        let result = self.try_place_order(cmd).await;
        metrics::histogram!("order_admission_duration_seconds")
            .record(start.elapsed().as_secs_f64());

        match &result {
            Ok(placed) => {
                metrics::counter!("orders_admitted_total").increment(1);
                metrics::gauge!("reservoir_remaining").set(placed.remaining.amount() as f64);
                tracing::info!(
                    order_id = %placed.order.id(),
                    status = %placed.order.status(),
                    remaining = %placed.remaining,
                    "order admitted"
                );
            }
            Err(e) => {
                metrics::counter!("orders_rejected_total", "reason" => e.reason()).increment(1);
                if e.is_internal() {
                    tracing::error!(reason = e.reason(), error = %e, "order admission failed");
                } else {
                    tracing::warn!(reason = e.reason(), error = %e, "order rejected");
                }
            }
        }

        result
    }

    async fn try_place_order(&self, cmd: PlaceOrder) -> Result<PlacedOrder> {
        let candidate = cmd.validate()?;

        let beverage = self
            .store
            .get_beverage(candidate.beverage_id)
            .await?
            .ok_or_else(|| {
                ServiceError::InvalidBeverageReference(candidate.beverage_id.to_string())
            })?;

        // Stamped under the store's lock so admission time matches queue position.
        let admitted = self
            .store
            .admit_order(|settings, in_progress_exists| {
                admit(settings, candidate, &beverage, in_progress_exists, Utc::now())
            })
            .await?;

        Ok(PlacedOrder {
            order: admitted.order,
            beverage,
            remaining: admitted.remaining,
        })
    }

    /// Completes the order at the dispenser and starts the next one.
    #[tracing::instrument(skip(self))]
    pub async fn complete_order(&self, cmd: CompleteOrder) -> Result<Completion> {
        let completion = self.store.complete_order(cmd.order_id).await?;

        metrics::counter!("orders_completed_total").increment(1);
        tracing::info!(order_id = %completion.completed.id(), "order completed");

        if let Some(promoted) = &completion.promoted {
            metrics::counter!("orders_promoted_total").increment(1);
            tracing::info!(order_id = %promoted.id(), "queued order promoted");
        }

        Ok(completion)
    }

    /// Gets an order by ID.
    pub async fn get_order(&self, order_id: OrderId) -> Result<Order> {
        self.store
            .get_order(order_id)
            .await?
            .ok_or(ServiceError::OrderNotFound(order_id))
    }

    /// Lists orders in creation order.
    pub async fn list_orders(&self, query: OrderQuery) -> Result<Vec<Order>> {
        Ok(self.store.query_orders(query).await?)
    }

    /// Reads the current reservoir settings.
    pub async fn get_reservoir(&self) -> Result<ReservoirSettings> {
        self.store
            .load_settings()
            .await?
            .ok_or(OrderError::Configuration(ConfigurationError::MissingSettings).into())
    }

    /// Adds a beverage to the catalog.
    #[tracing::instrument(skip(self, new_beverage))]
    pub async fn create_beverage(&self, new_beverage: NewBeverage) -> Result<Beverage> {
        let beverage = new_beverage.validate()?;
        let beverage = self.store.insert_beverage(beverage).await?;
        tracing::info!(beverage_id = %beverage.id, name = %beverage.name, "beverage created");
        Ok(beverage)
    }

    /// Lists the catalog.
    pub async fn list_beverages(&self) -> Result<Vec<Beverage>> {
        Ok(self.store.list_beverages().await?)
    }

    /// Gets a beverage by ID.
    pub async fn get_beverage(&self, id: BeverageId) -> Result<Beverage> {
        self.store
            .get_beverage(id)
            .await?
            .ok_or(ServiceError::BeverageNotFound(id))
    }

    /// Applies a partial update to a catalog entry.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_beverage(&self, id: BeverageId, patch: BeveragePatch) -> Result<Beverage> {
        let current = self.get_beverage(id).await?;
        let updated = patch.apply(&current)?;

        let updated = self
            .store
            .update_beverage(updated)
            .await?
            .ok_or(ServiceError::BeverageNotFound(id))?;
        tracing::info!(beverage_id = %id, "beverage updated");
        Ok(updated)
    }

    /// Removes a beverage from the catalog.
    #[tracing::instrument(skip(self))]
    pub async fn delete_beverage(&self, id: BeverageId) -> Result<()> {
        if !self.store.delete_beverage(id).await? {
            return Err(ServiceError::BeverageNotFound(id));
        }
        tracing::info!(beverage_id = %id, "beverage removed");
        Ok(())
    }
}
