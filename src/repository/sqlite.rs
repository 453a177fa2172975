use crate::config::DatabaseConfig;
use crate::error::{ProcessingError, Result};
use crate::models::Observation;
use crate::repository::CrudRepository;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use tracing::{debug, info};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS observations (
        id                   INTEGER PRIMARY KEY AUTOINCREMENT,
        locality             TEXT    NOT NULL,
        province             TEXT    NOT NULL,
        max_temperature      REAL    NOT NULL,
        max_temperature_time TEXT    NOT NULL,
        min_temperature      REAL    NOT NULL,
        min_temperature_time TEXT    NOT NULL,
        precipitation        REAL    NOT NULL,
        day                  TEXT    NOT NULL
    )
"#;

const SELECT_COLUMNS: &str = r#"
    SELECT id, locality, province, max_temperature, max_temperature_time,
           min_temperature, min_temperature_time, precipitation, day
    FROM observations
"#;

#[derive(Debug, FromRow)]
struct ObservationRow {
    id: i64,
    locality: String,
    province: String,
    max_temperature: f64,
    max_temperature_time: NaiveTime,
    min_temperature: f64,
    min_temperature_time: NaiveTime,
    precipitation: f64,
    day: NaiveDate,
}

impl From<ObservationRow> for Observation {
    fn from(row: ObservationRow) -> Self {
        Observation::new(
            row.locality,
            row.province,
            row.max_temperature,
            row.max_temperature_time,
            row.min_temperature,
            row.min_temperature_time,
            row.precipitation,
            row.day,
        )
        .with_id(row.id)
    }
}

/// Observation store backed by a SQLite pool
#[derive(Clone)]
pub struct SqliteObservationRepository {
    pool: SqlitePool,
}

impl SqliteObservationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool for `config.url`, creating the table when `init_tables` is set.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;

        info!("Database connection established ({})", config.url);

        let repository = Self::new(pool);
        if config.init_tables {
            repository.init_tables().await?;
        }
        Ok(repository)
    }

    pub async fn init_tables(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        debug!("Observations table ready");
        Ok(())
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM observations")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl CrudRepository<Observation, i64> for SqliteObservationRepository {
    /// Always inserts a new row; any id already on `entity` is replaced.
    async fn save(&self, entity: Observation) -> Result<Observation> {
        let result = sqlx::query(
            r#"
            INSERT INTO observations (
                locality, province, max_temperature, max_temperature_time,
                min_temperature, min_temperature_time, precipitation, day
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entity.locality)
        .bind(&entity.province)
        .bind(entity.max_temperature)
        .bind(entity.max_temperature_time)
        .bind(entity.min_temperature)
        .bind(entity.min_temperature_time)
        .bind(entity.precipitation)
        .bind(entity.day)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!("Saved observation {} for {}", id, entity.locality);
        Ok(entity.with_id(id))
    }

    async fn update(&self, id: i64, entity: Observation) -> Result<Observation> {
        let result = sqlx::query(
            r#"
            UPDATE observations
            SET locality = ?, province = ?, max_temperature = ?, max_temperature_time = ?,
                min_temperature = ?, min_temperature_time = ?, precipitation = ?, day = ?
            WHERE id = ?
            "#,
        )
        .bind(&entity.locality)
        .bind(&entity.province)
        .bind(entity.max_temperature)
        .bind(entity.max_temperature_time)
        .bind(entity.min_temperature)
        .bind(entity.min_temperature_time)
        .bind(entity.precipitation)
        .bind(entity.day)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ProcessingError::ObservationNotFound { id });
        }

        Ok(entity.with_id(id))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Observation>> {
        let row = sqlx::query_as::<_, ObservationRow>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Observation::from))
    }

    async fn find_all(&self) -> Result<Vec<Observation>> {
        let rows = sqlx::query_as::<_, ObservationRow>(&format!("{} ORDER BY id", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Observation::from).collect())
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM observations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM observations")
            .execute(&self.pool)
            .await?;

        info!("Deleted {} observations", result.rows_affected());
        Ok(result.rows_affected())
    }
}
