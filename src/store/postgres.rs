//! PostgreSQL-backed [`Store`].
//!
//! Documents are stored as rows whose embedded sensor lists are JSONB arrays:
//!
//! ```text
//! users          (id TEXT, name TEXT)
//! sensor_records (id, user_id TEXT, sensors JSONB)   -- [{sensorId, sensorType}]
//! environments   (id TEXT, name TEXT, user_id TEXT, sensors JSONB)
//! ```
//!
//! The tables belong to the writer side of the platform; this module only
//! issues `SELECT`s.

use std::{collections::HashMap, str::FromStr};

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    types::Json,
    PgPool,
};

use super::Store;
use crate::{
    error::StoreError,
    models::{Environment, EnvironmentSensor, Sensor, SensorRecord, User},
    Config,
};

// ---

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct SensorRecordRow {
    user_id: String,
    sensors: Option<Json<Vec<Sensor>>>,
}

#[derive(sqlx::FromRow)]
struct EnvironmentRow {
    id: String,
    name: String,
    user_id: String,
    sensors: Option<Json<Vec<EnvironmentSensor>>>,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build the pool from `cfg` and prove it works with a ping.
    ///
    /// Fails if the URL is invalid or the database is unreachable within the
    /// configured connect timeout.
    pub async fn connect(cfg: &Config) -> Result<Self> {
        // ---
        let statement_ms = cfg.db_statement_timeout.as_millis().to_string();
        let options = PgConnectOptions::from_str(&cfg.db_url)
            .context("Invalid DATABASE_URL")?
            .options([("statement_timeout", statement_ms.as_str())]);

        let pool = PgPoolOptions::new()
            .max_connections(cfg.db_pool_max)
            .acquire_timeout(cfg.db_connect_timeout)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        let store = Self::new(pool);
        store.ping().await.context("Database ping failed")?;
        Ok(store)
    }

    /// Run a query yielding one nullable text column per flattened sensor.
    async fn flatten(&self, sql: &str, field: &str) -> Result<Vec<String>, StoreError> {
        // ---
        let values: Vec<Option<String>> = sqlx::query_scalar(sql).fetch_all(&self.pool).await?;
        values
            .into_iter()
            .map(|v| v.ok_or_else(|| StoreError::Malformed(format!("sensor entry without {field}"))))
            .collect()
    }
}

#[async_trait]
impl Store for PgStore {
    async fn sensor_records(&self) -> Result<Vec<SensorRecord>, StoreError> {
        // ---
        let rows: Vec<SensorRecordRow> =
            sqlx::query_as("SELECT user_id, sensors FROM sensor_records ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|r| SensorRecord {
                user_id: r.user_id,
                sensors: r.sensors.map(|Json(s)| s).unwrap_or_default(),
            })
            .collect())
    }

    async fn environments(&self) -> Result<Vec<Environment>, StoreError> {
        // ---
        let rows: Vec<EnvironmentRow> =
            sqlx::query_as("SELECT id, name, user_id, sensors FROM environments ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|r| Environment {
                id: r.id,
                name: r.name,
                user_id: r.user_id,
                sensors: r.sensors.map(|Json(s)| s).unwrap_or_default(),
            })
            .collect())
    }

    async fn users(&self) -> Result<Vec<User>, StoreError> {
        let users: Vec<User> = sqlx::query_as("SELECT id, name FROM users")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn sensor_types(&self) -> Result<Vec<String>, StoreError> {
        self.flatten(
            r#"
            SELECT s ->> 'sensorType'
            FROM sensor_records r
            CROSS JOIN LATERAL jsonb_array_elements(COALESCE(r.sensors, '[]'::jsonb)) AS s
            "#,
            "sensorType",
        )
        .await
    }

    async fn record_sensor_count(&self) -> Result<u64, StoreError> {
        // ---
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM sensor_records r
            CROSS JOIN LATERAL jsonb_array_elements(COALESCE(r.sensors, '[]'::jsonb)) AS s
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        u64::try_from(count).map_err(|_| StoreError::Malformed(format!("negative count {count}")))
    }

    async fn environment_sensor_ids(&self) -> Result<Vec<String>, StoreError> {
        self.flatten(
            r#"
            SELECT s ->> 'sensorId'
            FROM environments e
            CROSS JOIN LATERAL jsonb_array_elements(COALESCE(e.sensors, '[]'::jsonb)) AS s
            "#,
            "sensorId",
        )
        .await
    }

    async fn sensor_type_index(&self) -> Result<HashMap<String, String>, StoreError> {
        // ---
        let rows: Vec<(Option<String>, Option<String>)> = sqlx::query_as(
            r#"
            SELECT s ->> 'sensorId', s ->> 'sensorType'
            FROM sensor_records r
            CROSS JOIN LATERAL jsonb_array_elements(COALESCE(r.sensors, '[]'::jsonb)) AS s
            ORDER BY r.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| match row {
                (Some(id), Some(ty)) => Ok((id, ty)),
                _ => Err(StoreError::Malformed(
                    "sensor entry without sensorId or sensorType".into(),
                )),
            })
            .collect()
    }
}
