use std::sync::Arc;

use async_trait::async_trait;
use common::{BeverageId, OrderId};
use domain::{
    Admission, Beverage, Completion, ConfigurationError, Order, OrderError, OrderStatus,
    ReservoirSettings, advance, any_in_progress,
};
use tokio::sync::RwLock;

use crate::{
    OrderQuery, Result, StoreError,
    store::{Admitted, DispenserStore},
};

#[derive(Debug, Default)]
struct DispenserState {
    beverages: Vec<Beverage>,
    /// Kept in creation order.
    orders: Vec<Order>,
    settings: Option<ReservoirSettings>,
}

impl DispenserState {
    fn name_taken(&self, name: &str, except: Option<BeverageId>) -> bool {
        self.beverages
            .iter()
            .any(|b| b.name == name && Some(b.id) != except)
    }
}

/// In-memory dispenser store implementation.
///
/// All records live behind a single lock. Admission and completion hold the
/// write guard for their whole check-then-write sequence, which gives the
/// same guarantees as the PostgreSQL implementation's transactions.
#[derive(Clone, Default)]
pub struct InMemoryDispenserStore {
    state: Arc<RwLock<DispenserState>>,
}

impl InMemoryDispenserStore {
    /// Creates a new empty in-memory store with no settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already provisioned with `settings`.
    pub fn with_settings(settings: ReservoirSettings) -> Self {
        let state = DispenserState {
            settings: Some(settings),
            ..Default::default()
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Returns the total number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }
}

#[async_trait]
impl DispenserStore for InMemoryDispenserStore {
    async fn insert_beverage(&self, beverage: Beverage) -> Result<Beverage> {
        let mut state = self.state.write().await;
        if state.name_taken(&beverage.name, None) {
            return Err(StoreError::DuplicateBeverageName {
                name: beverage.name,
            });
        }
        state.beverages.push(beverage.clone());
        Ok(beverage)
    }

    async fn get_beverage(&self, id: BeverageId) -> Result<Option<Beverage>> {
        let state = self.state.read().await;
        Ok(state.beverages.iter().find(|b| b.id == id).cloned())
    }

    async fn list_beverages(&self) -> Result<Vec<Beverage>> {
        Ok(self.state.read().await.beverages.clone())
    }

    async fn update_beverage(&self, beverage: Beverage) -> Result<Option<Beverage>> {
        let mut state = self.state.write().await;
        if state.name_taken(&beverage.name, Some(beverage.id)) {
            return Err(StoreError::DuplicateBeverageName {
                name: beverage.name,
            });
        }
        let Some(slot) = state.beverages.iter_mut().find(|b| b.id == beverage.id) else {
            return Ok(None);
        };
        *slot = beverage.clone();
        Ok(Some(beverage))
    }

    async fn delete_beverage(&self, id: BeverageId) -> Result<bool> {
        let mut state = self.state.write().await;
        let before = state.beverages.len();
        state.beverages.retain(|b| b.id != id);
        Ok(state.beverages.len() != before)
    }

    async fn load_settings(&self) -> Result<Option<ReservoirSettings>> {
        Ok(self.state.read().await.settings.clone())
    }

    async fn provision_settings(&self, settings: ReservoirSettings) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.settings.is_some() {
            return Ok(false);
        }
        state.settings = Some(settings);
        Ok(true)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>> {
        let state = self.state.read().await;
        Ok(state.orders.iter().find(|o| o.id() == id).cloned())
    }

    async fn query_orders(&self, query: OrderQuery) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        let orders = state
            .orders
            .iter()
            .filter(|o| query.status.is_none_or(|status| o.status() == status))
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(orders)
    }

    async fn admit_order<F>(&self, decide: F) -> Result<Admitted>
    where
        F: FnOnce(&mut ReservoirSettings, bool) -> std::result::Result<Admission, OrderError>
            + Send,
    {
        let mut state = self.state.write().await;

        let mut working = state
            .settings
            .clone()
            .ok_or(OrderError::Configuration(ConfigurationError::MissingSettings))?;
        let busy = any_in_progress(&state.orders);

        let Admission { order, volume } = decide(&mut working, busy)?;
        if busy && order.status() == OrderStatus::InProgress {
            return Err(StoreError::QueueConflict);
        }

        let remaining = working.remaining();
        state.settings = Some(working);
        state.orders.push(order.clone());

        Ok(Admitted {
            order,
            volume,
            remaining,
        })
    }

    async fn complete_order(&self, id: OrderId) -> Result<Completion> {
        let mut state = self.state.write().await;
        advance(&mut state.orders, id)?.ok_or(StoreError::OrderNotFound(id))
    }
}
