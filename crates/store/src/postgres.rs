use async_trait::async_trait;
use common::{BeverageId, OrderId};
use domain::{
    Admission, Beverage, Completion, ConfigurationError, DrinkSize, DrinkSizeVolume, Order,
    OrderError, OrderStatus, ReservoirSettings, Volume,
};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    OrderQuery, Result, StoreError,
    store::{Admitted, DispenserStore},
};

/// Advisory lock taken by every transaction that moves water or changes
/// which order holds the dispenser.
const DISPENSER_LOCK_KEY: i64 = 0x0D15_9E45;

const UNIQUE_BEVERAGE_NAME: &str = "beverages_name_key";
const ONE_ORDER_IN_PROGRESS: &str = "one_order_in_progress";

const ORDER_COLUMNS: &str = "id, customer, beverage_id, drink_size, status, created_at";
const BEVERAGE_COLUMNS: &str = "id, name, beverage_type, temperature, garnish";

/// PostgreSQL-backed dispenser store implementation.
#[derive(Clone)]
pub struct PostgresDispenserStore {
    pool: PgPool,
}

impl PostgresDispenserStore {
    /// Creates a new PostgreSQL dispenser store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_beverage(row: PgRow) -> Result<Beverage> {
        Ok(Beverage {
            id: BeverageId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            beverage_type: row.try_get("beverage_type")?,
            temperature: row.try_get("temperature")?,
            garnish: row.try_get("garnish")?,
        })
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let size: String = row.try_get("drink_size")?;
        let status: String = row.try_get("status")?;

        Ok(Order::restore(
            OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            row.try_get("customer")?,
            BeverageId::from_uuid(row.try_get::<Uuid, _>("beverage_id")?),
            size
                .parse::<DrinkSize>()
                .map_err(|e| StoreError::Corrupt(format!("orders.drink_size: {e}")))?,
            status
                .parse::<OrderStatus>()
                .map_err(|e| StoreError::Corrupt(format!("orders.status: {e}")))?,
            row.try_get("created_at")?,
        ))
    }

    fn row_to_settings(row: PgRow) -> Result<ReservoirSettings> {
        let drink_sizes: serde_json::Value = row.try_get("drink_sizes")?;
        let drink_sizes: Vec<DrinkSizeVolume> = serde_json::from_value(drink_sizes)?;

        Ok(ReservoirSettings::new(
            Volume::new(row.try_get("remaining")?),
            drink_sizes,
            row.try_get("allowed_types")?,
        ))
    }

    fn violates(err: &sqlx::Error, constraint: &str) -> bool {
        matches!(err, sqlx::Error::Database(db_err) if db_err.constraint() == Some(constraint))
    }

    fn map_beverage_write(err: sqlx::Error, name: &str) -> StoreError {
        if Self::violates(&err, UNIQUE_BEVERAGE_NAME) {
            return StoreError::DuplicateBeverageName {
                name: name.to_string(),
            };
        }
        StoreError::Database(err)
    }

    fn map_order_write(err: sqlx::Error) -> StoreError {
        if Self::violates(&err, ONE_ORDER_IN_PROGRESS) {
            return StoreError::QueueConflict;
        }
        StoreError::Database(err)
    }
}

#[async_trait]
impl DispenserStore for PostgresDispenserStore {
    async fn insert_beverage(&self, beverage: Beverage) -> Result<Beverage> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO beverages (id, name, beverage_type, temperature, garnish)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {BEVERAGE_COLUMNS}
            "#
        ))
        .bind(beverage.id.as_uuid())
        .bind(&beverage.name)
        .bind(&beverage.beverage_type)
        .bind(beverage.temperature)
        .bind(&beverage.garnish)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::map_beverage_write(e, &beverage.name))?;

        Self::row_to_beverage(row)
    }

    async fn get_beverage(&self, id: BeverageId) -> Result<Option<Beverage>> {
        let row = sqlx::query(&format!(
            "SELECT {BEVERAGE_COLUMNS} FROM beverages WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_beverage).transpose()
    }

    async fn list_beverages(&self) -> Result<Vec<Beverage>> {
        let rows = sqlx::query(&format!(
            "SELECT {BEVERAGE_COLUMNS} FROM beverages ORDER BY seq ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_beverage).collect()
    }

    async fn update_beverage(&self, beverage: Beverage) -> Result<Option<Beverage>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE beverages
            SET name = $2, beverage_type = $3, temperature = $4, garnish = $5
            WHERE id = $1
            RETURNING {BEVERAGE_COLUMNS}
            "#
        ))
        .bind(beverage.id.as_uuid())
        .bind(&beverage.name)
        .bind(&beverage.beverage_type)
        .bind(beverage.temperature)
        .bind(&beverage.garnish)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::map_beverage_write(e, &beverage.name))?;

        row.map(Self::row_to_beverage).transpose()
    }

    async fn delete_beverage(&self, id: BeverageId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM beverages WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn load_settings(&self) -> Result<Option<ReservoirSettings>> {
        let row = sqlx::query(
            "SELECT remaining, drink_sizes, allowed_types FROM settings WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_settings).transpose()
    }

    async fn provision_settings(&self, settings: ReservoirSettings) -> Result<bool> {
        let drink_sizes = serde_json::to_value(settings.drink_sizes())?;

        let result = sqlx::query(
            r#"
            INSERT INTO settings (id, remaining, drink_sizes, allowed_types)
            VALUES (1, $1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(settings.remaining().amount())
        .bind(drink_sizes)
        .bind(settings.allowed_types().to_vec())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn query_orders(&self, query: OrderQuery) -> Result<Vec<Order>> {
        let mut sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE 1=1");
        let mut param_count = 0;

        if query.status.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND status = ${param_count}"));
        }

        sql.push_str(" ORDER BY created_at ASC, seq ASC");

        if query.limit.is_some() {
            param_count += 1;
            sql.push_str(&format!(" LIMIT ${param_count}"));
        }
        if query.offset.is_some() {
            param_count += 1;
            sql.push_str(&format!(" OFFSET ${param_count}"));
        }

        let mut sqlx_query = sqlx::query(&sql);

        if let Some(status) = query.status {
            sqlx_query = sqlx_query.bind(status.as_str());
        }
        if let Some(limit) = query.limit {
            sqlx_query = sqlx_query.bind(sql_count(limit));
        }
        if let Some(offset) = query.offset {
            sqlx_query = sqlx_query.bind(sql_count(offset));
        }

        let rows = sqlx_query.fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn admit_order<F>(&self, decide: F) -> Result<Admitted>
    where
        F: FnOnce(&mut ReservoirSettings, bool) -> std::result::Result<Admission, OrderError>
            + Send,
    {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(DISPENSER_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query(
            "SELECT remaining, drink_sizes, allowed_types FROM settings WHERE id = 1 FOR UPDATE",
        )
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = row else {
            return Err(OrderError::Configuration(ConfigurationError::MissingSettings).into());
        };
        let mut working = Self::row_to_settings(row)?;

        let busy: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM orders WHERE status = 'In Progress')",
        )
        .fetch_one(&mut *tx)
        .await?;

        let Admission { order, volume } = decide(&mut working, busy)?;
        if busy && order.status() == OrderStatus::InProgress {
            return Err(StoreError::QueueConflict);
        }

        // The guard repeats the capacity rule so the row can never go non-positive.
        let remaining: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE settings SET remaining = remaining - $1
            WHERE id = 1 AND remaining - $1 > 0
            RETURNING remaining
            "#,
        )
        .bind(volume.amount())
        .fetch_optional(&mut *tx)
        .await?;
        let Some(remaining) = remaining else {
            return Err(OrderError::InsufficientReservoir.into());
        };

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO orders (id, customer, beverage_id, drink_size, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order.id().as_uuid())
        .bind(order.customer())
        .bind(order.beverage_id().as_uuid())
        .bind(order.size().as_str())
        .bind(order.status().as_str())
        .bind(order.created_at())
        .fetch_one(&mut *tx)
        .await
        .map_err(Self::map_order_write)?;
        let order = Self::row_to_order(row)?;

        tx.commit().await?;

        tracing::debug!(
            order_id = %order.id(),
            status = %order.status(),
            remaining,
            "order row written"
        );

        Ok(Admitted {
            order,
            volume,
            remaining: Volume::new(remaining),
        })
    }

    async fn complete_order(&self, id: OrderId) -> Result<Completion> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(DISPENSER_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = row else {
            return Err(StoreError::OrderNotFound(id));
        };
        let mut completed = Self::row_to_order(row)?;
        completed.complete()?;

        let result = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1 AND status = $3")
            .bind(id.as_uuid())
            .bind(OrderStatus::Completed.as_str())
            .bind(OrderStatus::InProgress.as_str())
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() != 1 {
            return Err(OrderError::NotInProgress { order_id: id }.into());
        }

        let next = sqlx::query(&format!(
            r#"
            SELECT {ORDER_COLUMNS} FROM orders
            WHERE status = $1
            ORDER BY created_at ASC, seq ASC
            LIMIT 1
            FOR UPDATE
            "#
        ))
        .bind(OrderStatus::InQueue.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let promoted = match next {
            Some(row) => {
                let mut order = Self::row_to_order(row)?;
                order.promote()?;
                sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
                    .bind(order.id().as_uuid())
                    .bind(order.status().as_str())
                    .execute(&mut *tx)
                    .await
                    .map_err(Self::map_order_write)?;
                Some(order)
            }
            None => None,
        };

        tx.commit().await?;

        Ok(Completion {
            completed,
            promoted,
        })
    }
}

/// Converts a paging value to a SQL BIGINT, saturating at `i64::MAX`.
fn sql_count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
