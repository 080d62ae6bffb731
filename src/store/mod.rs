//! Read-only access to the IoT document store.
//!
//! [`Store`] exposes the handful of projections the reports need. The
//! provided methods derive them from whole documents; [`PgStore`] overrides
//! them with queries that flatten the JSONB arrays inside the database.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::{
    error::StoreError,
    models::{Environment, SensorRecord, User},
};

#[cfg(test)]
mod memory;
mod postgres;

#[cfg(test)]
pub use memory::MemoryStore;
pub use postgres::PgStore;

// ---

#[async_trait]
pub trait Store: Send + Sync {
    /// Every sensor record document.
    async fn sensor_records(&self) -> Result<Vec<SensorRecord>, StoreError>;

    /// Every environment document, in a stable order.
    async fn environments(&self) -> Result<Vec<Environment>, StoreError>;

    /// Every user document.
    async fn users(&self) -> Result<Vec<User>, StoreError>;

    /// Cheap round trip proving the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// `sensors[*].sensorType` across all sensor records.
    async fn sensor_types(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .sensor_records()
            .await?
            .into_iter()
            .flat_map(|r| r.sensors)
            .map(|s| s.sensor_type)
            .collect())
    }

    /// Number of sensor entries across all sensor records, duplicates kept.
    async fn record_sensor_count(&self) -> Result<u64, StoreError> {
        Ok(self
            .sensor_records()
            .await?
            .iter()
            .map(|r| r.sensors.len() as u64)
            .sum())
    }

    /// `sensors[*].sensorId` across all environments, duplicates kept.
    async fn environment_sensor_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .environments()
            .await?
            .into_iter()
            .flat_map(|e| e.sensors)
            .map(|s| s.sensor_id)
            .collect())
    }

    /// `sensorId -> sensorType` over all sensor records. Later entries win
    /// when an id is repeated.
    async fn sensor_type_index(&self) -> Result<HashMap<String, String>, StoreError> {
        Ok(self
            .sensor_records()
            .await?
            .into_iter()
            .flat_map(|r| r.sensors)
            .map(|s| (s.sensor_id, s.sensor_type))
            .collect())
    }

    /// `userId -> name`.
    async fn user_names(&self) -> Result<HashMap<String, String>, StoreError> {
        Ok(self
            .users()
            .await?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect())
    }
}
