//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use chrono::Utc;
use common::{BeverageId, OrderId};
use domain::{
    Beverage, ConfigurationError, DrinkSize, OrderCandidate, OrderError, OrderStatus,
    ReservoirSettings, Volume, admit,
};
use sqlx::PgPool;
use store::{
    Admitted, DispenserStore, DispenserStoreExt, OrderQuery, PostgresDispenserStore, StoreError,
};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            // Run migrations using raw_sql to execute multiple statements
            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_dispenser_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared tables
async fn get_test_store() -> PostgresDispenserStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE beverages, orders, settings")
        .execute(&pool)
        .await
        .unwrap();

    PostgresDispenserStore::new(pool)
}

async fn provisioned_store(remaining: i64) -> PostgresDispenserStore {
    let store = get_test_store().await;
    store
        .provision_settings(ReservoirSettings::new(
            Volume::new(remaining),
            ReservoirSettings::default_drink_sizes(),
            vec!["Tea".to_string(), "Coffee".to_string()],
        ))
        .await
        .unwrap();
    store
}

fn beverage(name: &str, beverage_type: &str) -> Beverage {
    Beverage {
        id: BeverageId::new(),
        name: name.to_string(),
        beverage_type: beverage_type.to_string(),
        temperature: 80.0,
        garnish: Some("Orange".to_string()),
    }
}

async fn place(
    store: &PostgresDispenserStore,
    beverage: &Beverage,
    size: DrinkSize,
) -> Result<Admitted, StoreError> {
    let candidate = OrderCandidate {
        customer: "John".to_string(),
        beverage_id: beverage.id,
        size,
    };
    store
        .admit_order(|settings, busy| admit(settings, candidate, beverage, busy, Utc::now()))
        .await
}

#[tokio::test]
async fn beverage_crud_round_trip() {
    let store = get_test_store().await;
    let tea = beverage("Green Tea", "Tea");

    store.insert_beverage(tea.clone()).await.unwrap();
    assert_eq!(store.get_beverage(tea.id).await.unwrap(), Some(tea.clone()));

    let mut warmer = tea.clone();
    warmer.temperature = 90.0;
    warmer.garnish = None;
    let updated = store.update_beverage(warmer).await.unwrap().unwrap();
    assert_eq!(updated.temperature, 90.0);
    assert!(updated.garnish.is_none());

    assert!(store.delete_beverage(tea.id).await.unwrap());
    assert!(store.get_beverage(tea.id).await.unwrap().is_none());
    assert!(!store.delete_beverage(tea.id).await.unwrap());
}

#[tokio::test]
async fn duplicate_beverage_name_maps_to_store_error() {
    let store = get_test_store().await;
    store
        .insert_beverage(beverage("Green Tea", "Tea"))
        .await
        .unwrap();

    let result = store.insert_beverage(beverage("Green Tea", "Tea")).await;

    assert!(matches!(
        result,
        Err(StoreError::DuplicateBeverageName { ref name }) if name == "Green Tea"
    ));
}

#[tokio::test]
async fn list_beverages_in_insertion_order() {
    let store = get_test_store().await;
    for name in ["Green Tea", "Espresso", "Black Tea"] {
        store.insert_beverage(beverage(name, "Tea")).await.unwrap();
    }

    let names: Vec<String> = store
        .list_beverages()
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.name)
        .collect();

    assert_eq!(names, vec!["Green Tea", "Espresso", "Black Tea"]);
}

#[tokio::test]
async fn settings_are_provisioned_once() {
    let store = provisioned_store(1000).await;

    let again = store
        .provision_settings(ReservoirSettings::new(
            Volume::new(99_999),
            ReservoirSettings::default_drink_sizes(),
            vec![],
        ))
        .await
        .unwrap();

    assert!(!again);
    let settings = store.load_settings().await.unwrap().unwrap();
    assert_eq!(settings.remaining(), Volume::new(1000));
    assert_eq!(settings.drink_sizes(), ReservoirSettings::default_drink_sizes());
    assert_eq!(settings.allowed_types(), ["Tea", "Coffee"]);
}

#[tokio::test]
async fn admission_without_settings_is_a_configuration_error() {
    let store = get_test_store().await;
    let tea = beverage("Green Tea", "Tea");

    let result = place(&store, &tea, DrinkSize::Small).await;

    assert!(matches!(
        result,
        Err(StoreError::Rejected(OrderError::Configuration(
            ConfigurationError::MissingSettings
        )))
    ));
}

#[tokio::test]
async fn admission_debits_reservoir_and_queues() {
    let store = provisioned_store(1000).await;
    let tea = beverage("Green Tea", "Tea");

    let first = place(&store, &tea, DrinkSize::Medium).await.unwrap();
    let second = place(&store, &tea, DrinkSize::Medium).await.unwrap();

    assert_eq!(first.order.status(), OrderStatus::InProgress);
    assert_eq!(first.remaining, Volume::new(750));
    assert_eq!(second.order.status(), OrderStatus::InQueue);
    assert_eq!(second.remaining, Volume::new(500));

    let stored = store.get_order(second.order.id()).await.unwrap().unwrap();
    assert_eq!(stored, second.order);
}

#[tokio::test]
async fn rejected_admission_leaves_no_trace() {
    let store = provisioned_store(100).await;
    let tea = beverage("Green Tea", "Tea");

    let result = place(&store, &tea, DrinkSize::Medium).await;

    assert!(matches!(
        result,
        Err(StoreError::Rejected(OrderError::InsufficientReservoir))
    ));
    assert!(store.list_orders().await.unwrap().is_empty());
    let settings = store.load_settings().await.unwrap().unwrap();
    assert_eq!(settings.remaining(), Volume::new(100));
}

#[tokio::test]
async fn complete_promotes_oldest_queued_order() {
    let store = provisioned_store(10_000).await;
    let tea = beverage("Green Tea", "Tea");
    let first = place(&store, &tea, DrinkSize::Small).await.unwrap().order;
    let second = place(&store, &tea, DrinkSize::Small).await.unwrap().order;
    let third = place(&store, &tea, DrinkSize::Small).await.unwrap().order;

    let completion = store.complete_order(first.id()).await.unwrap();

    assert_eq!(completion.completed.status(), OrderStatus::Completed);
    assert_eq!(completion.promoted.map(|o| o.id()), Some(second.id()));
    let current = store.current_order().await.unwrap().unwrap();
    assert_eq!(current.id(), second.id());
    let third = store.get_order(third.id()).await.unwrap().unwrap();
    assert_eq!(third.status(), OrderStatus::InQueue);
}

#[tokio::test]
async fn complete_rejects_unknown_and_queued_orders() {
    let store = provisioned_store(10_000).await;
    let tea = beverage("Green Tea", "Tea");
    let first = place(&store, &tea, DrinkSize::Small).await.unwrap().order;
    let queued = place(&store, &tea, DrinkSize::Small).await.unwrap().order;

    let unknown = OrderId::new();
    assert!(matches!(
        store.complete_order(unknown).await,
        Err(StoreError::OrderNotFound(id)) if id == unknown
    ));
    assert!(matches!(
        store.complete_order(queued.id()).await,
        Err(StoreError::Rejected(OrderError::NotInProgress { .. }))
    ));

    let first = store.get_order(first.id()).await.unwrap().unwrap();
    assert_eq!(first.status(), OrderStatus::InProgress);
}

#[tokio::test]
async fn query_orders_filters_and_pages() {
    let store = provisioned_store(10_000).await;
    let tea = beverage("Green Tea", "Tea");
    let mut ids = Vec::new();
    for _ in 0..5 {
        ids.push(place(&store, &tea, DrinkSize::Small).await.unwrap().order.id());
    }

    let queued = store
        .query_orders(OrderQuery::with_status(OrderStatus::InQueue))
        .await
        .unwrap();
    assert_eq!(queued.len(), 4);

    let page = store
        .query_orders(OrderQuery::new().offset(2).limit(2))
        .await
        .unwrap();
    let page: Vec<OrderId> = page.iter().map(|o| o.id()).collect();
    assert_eq!(page, ids[2..4]);

    let unbounded = store
        .query_orders(OrderQuery::new().limit(usize::MAX))
        .await
        .unwrap();
    assert_eq!(unbounded.len(), 5);

    let past_end = store
        .query_orders(OrderQuery::new().offset(usize::MAX))
        .await
        .unwrap();
    assert!(past_end.is_empty());
}

#[tokio::test]
async fn concurrent_admissions_never_overdraw() {
    let store = provisioned_store(1000).await;
    let tea = beverage("Green Tea", "Tea");

    let mut handles = Vec::new();
    for _ in 0..12 {
        let store = store.clone();
        let tea = tea.clone();
        handles.push(tokio::spawn(async move {
            place(&store, &tea, DrinkSize::Large).await
        }));
    }

    let mut admitted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => admitted += 1,
            Err(StoreError::Rejected(OrderError::InsufficientReservoir)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    // 1000 leaves room for two Large drinks.
    assert_eq!(admitted, 2);
    let settings = store.load_settings().await.unwrap().unwrap();
    assert_eq!(settings.remaining(), Volume::new(200));

    let in_progress = store
        .query_orders(OrderQuery::with_status(OrderStatus::InProgress))
        .await
        .unwrap();
    assert_eq!(in_progress.len(), 1);
}
