//! Repository Implementation

use crate::retry::{with_retry, RetryPolicy};
use crate::{StorageError, StoreConfig};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

const CREATE_FORECASTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS forecasts (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    date          TEXT    NOT NULL,
    temperature_c INTEGER NOT NULL,
    summary       TEXT    NOT NULL CHECK (summary <> '')
)
"#;

const SELECT_FORECASTS: &str = r#"
SELECT id, date, temperature_c, summary
FROM forecasts
ORDER BY date DESC, id ASC
"#;

const INSERT_FORECAST: &str =
    "INSERT INTO forecasts (date, temperature_c, summary) VALUES (?1, ?2, ?3)";

/// Persisted forecast record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub id: i64,
    pub date: NaiveDate,
    pub temperature_c: i32,
    pub summary: String,
}

/// Forecast awaiting insertion; the store assigns its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewForecast {
    pub date: NaiveDate,
    pub temperature_c: i32,
    pub summary: String,
}

impl NewForecast {
    fn persisted(&self, id: i64) -> Forecast {
        Forecast {
            id,
            date: self.date,
            temperature_c: self.temperature_c,
            summary: self.summary.clone(),
        }
    }
}

/// Repository for forecast rows backed by a SQLite pool
#[derive(Clone)]
pub struct ForecastRepository {
    pool: SqlitePool,
    retry: RetryPolicy,
    schema: Arc<OnceCell<()>>,
}

impl ForecastRepository {
    /// Create the repository without touching the database.
    ///
    /// Connections are opened on first use; the schema is created by the
    /// first operation that reaches the store. Only a malformed URL fails here.
    pub fn new(config: &StoreConfig) -> Result<Self, StorageError> {
        info!(
            max_connections = config.max_connections,
            max_retries = config.retry.max_retries,
            retry_delay_secs = config.retry.delay.as_secs(),
            "Configuring forecast store"
        );

        let mut options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout);

        // An in-memory database lives only as long as its connection
        if config.url.contains(":memory:") {
            options = options.idle_timeout(None).max_lifetime(None);
        }

        let pool = options.connect_lazy(&config.url)?;

        Ok(Self {
            pool,
            retry: config.retry,
            schema: Arc::new(OnceCell::new()),
        })
    }

    /// Create the repository and verify the store is reachable
    pub async fn connect(config: &StoreConfig) -> Result<Self, StorageError> {
        let repository = Self::new(config)?;
        with_retry(&repository.retry, "connect", || repository.ensure_schema()).await?;

        info!("Forecast store ready");
        Ok(repository)
    }

    async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        self.schema
            .get_or_try_init(|| async move {
                sqlx::query(CREATE_FORECASTS_TABLE)
                    .execute(&self.pool)
                    .await
                    .map(|_| debug!("Forecast schema ensured"))
            })
            .await
            .map(|_| ())
    }

    /// All forecasts, latest date first; equal dates keep insertion order
    pub async fn list(&self) -> Result<Vec<Forecast>, StorageError> {
        let forecasts = with_retry(&self.retry, "list", || async move {
            self.ensure_schema().await?;
            sqlx::query_as::<_, Forecast>(SELECT_FORECASTS)
                .fetch_all(&self.pool)
                .await
        })
        .await?;

        debug!(count = forecasts.len(), "Listed forecasts");
        Ok(forecasts)
    }

    /// Insert a batch in a single transaction.
    ///
    /// Either every record is committed or none is. Returns the persisted
    /// records in input order.
    pub async fn insert_batch(&self, batch: &[NewForecast]) -> Result<Vec<Forecast>, StorageError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let inserted = with_retry(&self.retry, "insert_batch", || self.insert_batch_once(batch)).await?;

        info!(count = inserted.len(), "Committed forecast batch");
        Ok(inserted)
    }

    async fn insert_batch_once(&self, batch: &[NewForecast]) -> Result<Vec<Forecast>, sqlx::Error> {
        self.ensure_schema().await?;

        // Dropping `tx` on any early return rolls the batch back
        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(batch.len());

        for forecast in batch {
            let id = sqlx::query(INSERT_FORECAST)
                .bind(forecast.date)
                .bind(forecast.temperature_c)
                .bind(&forecast.summary)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid();

            debug!(id, date = %forecast.date, "Inserted forecast");
            inserted.push(forecast.persisted(id));
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Close the pool; later calls fail
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
