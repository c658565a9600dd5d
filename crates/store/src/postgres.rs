use async_trait::async_trait;
use common::{DeliveryId, OrderId, PreparationId};
use domain::{Delivery, DeliveryStatus, Preparation, PreparationStatus};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::delivery::DeliveryStore;
use crate::page::{Page, PageRequest};
use crate::preparation::PreparationStore;
use crate::{Result, StoreError};

/// Runs the database migrations for both tables.
pub async fn run_migrations(pool: &PgPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    tracing::info!("database migrations applied");
    Ok(())
}

fn map_unique_violation(e: sqlx::Error, key: &'static str, value: String) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return StoreError::DuplicateKey { key, value };
    }
    StoreError::Database(e)
}

/// PostgreSQL-backed preparation store.
///
/// Natural-key idempotency rests on the `uq_preparations_order_id`
/// constraint; the take-next claim race resolves through a conditional
/// `UPDATE … WHERE status = $n`.
#[derive(Clone)]
pub struct PostgresPreparationStore {
    pool: PgPool,
}

impl PostgresPreparationStore {
    /// Creates a new store over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn row_to_preparation(row: PgRow) -> Result<Preparation> {
        let status_code: i16 = row.try_get("status")?;
        let status = PreparationStatus::from_code(status_code)
            .ok_or(StoreError::InvalidStatus(status_code))?;

        Ok(Preparation::from_stored(
            PreparationId::from_uuid(row.try_get::<Uuid, _>("id")?),
            OrderId::from_uuid(row.try_get::<Uuid, _>("order_id")?),
            status,
            row.try_get("created_at")?,
            row.try_get("order_snapshot")?,
        ))
    }
}

const PREPARATION_COLUMNS: &str = "id, order_id, status, created_at, order_snapshot";

#[async_trait]
impl PreparationStore for PostgresPreparationStore {
    async fn insert(&self, preparation: &Preparation) -> Result<()> {
        sqlx::query(
            "INSERT INTO preparations (id, order_id, status, created_at, order_snapshot)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(preparation.id().as_uuid())
        .bind(preparation.order_id().as_uuid())
        .bind(preparation.status().code())
        .bind(preparation.created_at())
        .bind(preparation.order_snapshot())
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "order_id", preparation.order_id().to_string()))?;

        Ok(())
    }

    async fn get(&self, id: PreparationId) -> Result<Option<Preparation>> {
        let row = sqlx::query(&format!(
            "SELECT {PREPARATION_COLUMNS} FROM preparations WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_preparation).transpose()
    }

    async fn get_by_order(&self, order_id: OrderId) -> Result<Option<Preparation>> {
        let row = sqlx::query(&format!(
            "SELECT {PREPARATION_COLUMNS} FROM preparations WHERE order_id = $1"
        ))
        .bind(order_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_preparation).transpose()
    }

    async fn update(&self, preparation: &Preparation) -> Result<()> {
        let result = sqlx::query(
            "UPDATE preparations SET status = $2, order_snapshot = $3 WHERE id = $1",
        )
        .bind(preparation.id().as_uuid())
        .bind(preparation.status().code())
        .bind(preparation.order_snapshot())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UnknownId(preparation.id().to_string()));
        }
        Ok(())
    }

    async fn update_if_status(
        &self,
        preparation: &Preparation,
        expected: PreparationStatus,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE preparations SET status = $2 WHERE id = $1 AND status = $3",
        )
        .bind(preparation.id().as_uuid())
        .bind(preparation.status().code())
        .bind(expected.code())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(true);
        }

        // Distinguish a lost race from an unknown id
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM preparations WHERE id = $1)")
                .bind(preparation.id().as_uuid())
                .fetch_one(&self.pool)
                .await?;

        if exists {
            Ok(false)
        } else {
            Err(StoreError::UnknownId(preparation.id().to_string()))
        }
    }

    async fn oldest_received(&self) -> Result<Option<Preparation>> {
        let row = sqlx::query(&format!(
            "SELECT {PREPARATION_COLUMNS} FROM preparations
             WHERE status = $1
             ORDER BY created_at ASC, id ASC
             LIMIT 1"
        ))
        .bind(PreparationStatus::Received.code())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_preparation).transpose()
    }

    async fn list(
        &self,
        page: PageRequest,
        status: Option<PreparationStatus>,
    ) -> Result<Page<Preparation>> {
        let status_code = status.map(|s| s.code());

        let total_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM preparations WHERE $1::smallint IS NULL OR status = $1",
        )
        .bind(status_code)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query(&format!(
            "SELECT {PREPARATION_COLUMNS} FROM preparations
             WHERE $1::smallint IS NULL OR status = $1
             ORDER BY created_at DESC, id ASC
             OFFSET $2 LIMIT $3"
        ))
        .bind(status_code)
        .bind(page.offset() as i64)
        .bind(page.limit() as i64)
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(Self::row_to_preparation)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page::new(items, total_count as u64))
    }
}

/// PostgreSQL-backed delivery store.
#[derive(Clone)]
pub struct PostgresDeliveryStore {
    pool: PgPool,
}

impl PostgresDeliveryStore {
    /// Creates a new store over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_delivery(row: PgRow) -> Result<Delivery> {
        let status_code: i16 = row.try_get("status")?;
        let status =
            DeliveryStatus::from_code(status_code).ok_or(StoreError::InvalidStatus(status_code))?;

        Ok(Delivery::from_stored(
            DeliveryId::from_uuid(row.try_get::<Uuid, _>("id")?),
            PreparationId::from_uuid(row.try_get::<Uuid, _>("preparation_id")?),
            row.try_get::<Option<Uuid>, _>("order_id")?.map(OrderId::from_uuid),
            status,
            row.try_get("created_at")?,
            row.try_get("finalized_at")?,
        ))
    }
}

const DELIVERY_COLUMNS: &str = "id, preparation_id, order_id, status, created_at, finalized_at";

#[async_trait]
impl DeliveryStore for PostgresDeliveryStore {
    async fn insert(&self, delivery: &Delivery) -> Result<()> {
        sqlx::query(
            "INSERT INTO deliveries (id, preparation_id, order_id, status, created_at, finalized_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(delivery.id().as_uuid())
        .bind(delivery.preparation_id().as_uuid())
        .bind(delivery.order_id().map(|o| o.as_uuid()))
        .bind(delivery.status().code())
        .bind(delivery.created_at())
        .bind(delivery.finalized_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, "preparation_id", delivery.preparation_id().to_string())
        })?;

        Ok(())
    }

    async fn get(&self, id: DeliveryId) -> Result<Option<Delivery>> {
        let row = sqlx::query(&format!(
            "SELECT {DELIVERY_COLUMNS} FROM deliveries WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_delivery).transpose()
    }

    async fn get_by_preparation(&self, preparation_id: PreparationId) -> Result<Option<Delivery>> {
        let row = sqlx::query(&format!(
            "SELECT {DELIVERY_COLUMNS} FROM deliveries WHERE preparation_id = $1"
        ))
        .bind(preparation_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_delivery).transpose()
    }

    async fn update(&self, delivery: &Delivery) -> Result<()> {
        let result = sqlx::query(
            "UPDATE deliveries SET status = $2, finalized_at = $3 WHERE id = $1",
        )
        .bind(delivery.id().as_uuid())
        .bind(delivery.status().code())
        .bind(delivery.finalized_at())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UnknownId(delivery.id().to_string()));
        }
        Ok(())
    }

    async fn list_ready(&self, page: PageRequest) -> Result<Page<Delivery>> {
        let total_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM deliveries WHERE status = $1")
                .bind(DeliveryStatus::ReadyForPickup.code())
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query(&format!(
            "SELECT {DELIVERY_COLUMNS} FROM deliveries
             WHERE status = $1
             ORDER BY created_at ASC, id ASC
             OFFSET $2 LIMIT $3"
        ))
        .bind(DeliveryStatus::ReadyForPickup.code())
        .bind(page.offset() as i64)
        .bind(page.limit() as i64)
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(Self::row_to_delivery)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page::new(items, total_count as u64))
    }
}
