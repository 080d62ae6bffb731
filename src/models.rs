//! Document models for the IoT store.
//!
//! These mirror the JSON documents written by the device management side of
//! the platform. The reporting service only ever reads them.

use serde::{Deserialize, Serialize};

// ---

/// A registered user. Only the display name is used by the reports.
#[derive(Debug, Clone, Deserialize, Serialize, sqlx::FromRow)]
pub struct User {
    // ---
    pub id: String,
    pub name: String,
}

/// A physical or virtual sensor owned through a [`SensorRecord`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sensor {
    // ---
    pub sensor_id: String,
    pub sensor_type: String,
}

/// Per-user document listing the sensors that user has registered.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorRecord {
    // ---
    pub user_id: String,
    #[serde(default)]
    pub sensors: Vec<Sensor>,
}

/// Sensor reference embedded in an [`Environment`].
///
/// Newer documents carry the sensor type alongside the id; older ones only
/// carry the id, in which case the type has to be joined from the sensor
/// records.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSensor {
    // ---
    pub sensor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_type: Option<String>,
}

/// A named grouping of sensors owned by one user.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    // ---
    pub id: String,
    pub name: String,
    pub user_id: String,
    #[serde(default)]
    pub sensors: Vec<EnvironmentSensor>,
}

impl Environment {
    /// Number of sensor entries assigned to this environment.
    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }
}
