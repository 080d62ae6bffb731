//! In-memory [`Store`] used by the test-suite.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use async_trait::async_trait;

use super::Store;
use crate::{
    error::StoreError,
    models::{Environment, EnvironmentSensor, Sensor, SensorRecord, User},
};

// ---

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Vec<User>,
    sensor_records: Vec<SensorRecord>,
    environments: Vec<Environment>,
    offline: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, id: &str, name: &str) -> Self {
        self.users.push(User {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    /// Add a sensor record; `sensors` are `(sensorId, sensorType)` pairs.
    pub fn with_sensor_record(mut self, user_id: &str, sensors: &[(&str, &str)]) -> Self {
        self.sensor_records.push(SensorRecord {
            user_id: user_id.to_string(),
            sensors: sensors
                .iter()
                .map(|(id, ty)| Sensor {
                    sensor_id: id.to_string(),
                    sensor_type: ty.to_string(),
                })
                .collect(),
        });
        self
    }

    /// Add an environment; `sensors` are `(sensorId, sensorType)` pairs.
    pub fn with_environment(
        mut self,
        id: &str,
        name: &str,
        user_id: &str,
        sensors: &[(&str, Option<&str>)],
    ) -> Self {
        self.environments.push(Environment {
            id: id.to_string(),
            name: name.to_string(),
            user_id: user_id.to_string(),
            sensors: sensors
                .iter()
                .map(|(id, ty)| EnvironmentSensor {
                    sensor_id: id.to_string(),
                    sensor_type: ty.map(str::to_string),
                })
                .collect(),
        });
        self
    }

    /// Make every call fail as if the database were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn sensor_records(&self) -> Result<Vec<SensorRecord>, StoreError> {
        self.check()?;
        Ok(self.sensor_records.clone())
    }

    async fn environments(&self) -> Result<Vec<Environment>, StoreError> {
        self.check()?;
        Ok(self.environments.clone())
    }

    async fn users(&self) -> Result<Vec<User>, StoreError> {
        self.check()?;
        Ok(self.users.clone())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_user("u1", "Ana")
            .with_sensor_record("u1", &[("A", "temp"), ("B", "temp")])
            .with_sensor_record("u2", &[("C", "hum")])
            .with_environment("e1", "Lab", "u1", &[("A", Some("temp")), ("C", None)])
    }

    #[test]
    fn test_projections_flatten_documents() {
        // ---
        let store = store();

        let types = tokio_test::block_on(store.sensor_types()).unwrap();
        assert_eq!(types, ["temp", "temp", "hum"]);

        let entries = tokio_test::block_on(store.record_sensor_count()).unwrap();
        assert_eq!(entries, 3);

        let env_ids = tokio_test::block_on(store.environment_sensor_ids()).unwrap();
        assert_eq!(env_ids, ["A", "C"]);

        let index = tokio_test::block_on(store.sensor_type_index()).unwrap();
        assert_eq!(index.get("C").map(String::as_str), Some("hum"));

        let names = tokio_test::block_on(store.user_names()).unwrap();
        assert_eq!(names.get("u1").map(String::as_str), Some("Ana"));
    }

    #[test]
    fn test_offline_store_fails_every_call() {
        // ---
        let store = store();
        store.set_offline(true);

        assert!(tokio_test::block_on(store.ping()).is_err());
        assert!(tokio_test::block_on(store.sensor_types()).is_err());

        store.set_offline(false);
        assert!(tokio_test::block_on(store.ping()).is_ok());
    }
}
