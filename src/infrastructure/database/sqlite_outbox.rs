use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::application::ports::OutboxStore;
use crate::domain::entities::QueuedCheckin;
use crate::domain::value_objects::{Barcode, CheckinId};
use crate::infrastructure::database::ConnectionPool;
use crate::shared::error::{AppError, Result};

pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// SQLite-backed outbox. Records survive process restarts; the pool
/// serializes access between awaited operations.
pub struct SqliteOutboxStore {
    connection: ConnectionPool,
    max_retries: u32,
}

#[derive(Debug, FromRow)]
struct OutboxRow {
    id: String,
    barcode: String,
    enqueued_at: i64,
    retry_count: i64,
    max_retries: i64,
}

impl OutboxRow {
    fn into_domain(self) -> Result<QueuedCheckin> {
        let id = CheckinId::parse(&self.id).map_err(AppError::Database)?;
        let barcode = Barcode::new(self.barcode).map_err(AppError::Database)?;
        let enqueued_at = DateTime::<Utc>::from_timestamp(self.enqueued_at, 0)
            .ok_or_else(|| AppError::Database(format!("invalid timestamp for record {id}")))?;

        Ok(QueuedCheckin {
            id,
            barcode,
            enqueued_at,
            retry_count: self.retry_count as u32,
            max_retries: self.max_retries as u32,
        })
    }
}

impl SqliteOutboxStore {
    pub fn new(connection: ConnectionPool) -> Self {
        Self {
            connection,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

#[async_trait]
impl OutboxStore for SqliteOutboxStore {
    async fn enqueue(&self, barcode: Barcode) -> Result<CheckinId> {
        let record = QueuedCheckin::new(barcode, self.max_retries, Utc::now());

        sqlx::query(
            r#"
            INSERT INTO outbox (id, barcode, enqueued_at, retry_count, max_retries)
            VALUES (?1, ?2, ?3, 0, ?4)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.barcode.as_str())
        .bind(record.enqueued_at.timestamp())
        .bind(record.max_retries as i64)
        .execute(self.connection.pool())
        .await?;

        Ok(record.id)
    }

    async fn list(&self) -> Result<Vec<QueuedCheckin>> {
        let rows = sqlx::query_as::<_, OutboxRow>(
            "SELECT * FROM outbox ORDER BY enqueued_at ASC",
        )
        .fetch_all(self.connection.pool())
        .await?;

        rows.into_iter().map(OutboxRow::into_domain).collect()
    }

    async fn remove(&self, id: CheckinId) -> Result<()> {
        sqlx::query("DELETE FROM outbox WHERE id = ?1")
            .bind(id.to_string())
            .execute(self.connection.pool())
            .await?;

        Ok(())
    }

    async fn update_retry_count(&self, id: CheckinId, retry_count: u32) -> Result<()> {
        let result = sqlx::query("UPDATE outbox SET retry_count = ?2 WHERE id = ?1")
            .bind(id.to_string())
            .bind(retry_count as i64)
            .execute(self.connection.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("queued check-in {id}")));
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM outbox")
            .fetch_one(self.connection.pool())
            .await?;

        Ok(count as u64)
    }

    async fn clear_all(&self) -> Result<()> {
        sqlx::query("DELETE FROM outbox")
            .execute(self.connection.pool())
            .await?;

        Ok(())
    }
}
