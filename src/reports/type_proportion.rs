//! Sensor-type proportion per environment, as a contingency table.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::{error::ReportError, models::Environment};

use super::{SensorTypeSource, UNKNOWN_LABEL};

// ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentTypeCount {
    // ---
    pub environment_name: String,
    pub sensor_type: String,
    pub count: u64,
}

/// Count sensors per `(environment, sensor type)`.
///
/// With [`SensorTypeSource::Embedded`] the type comes from the environment's
/// own sensor entry and an entry without one is a malformed document. With
/// [`SensorTypeSource::Joined`] it is looked up in `type_index` by sensor id,
/// and ids that do not resolve are counted under [`UNKNOWN_LABEL`].
///
/// Environments are ordered by total sensor count descending, then by name;
/// rows within one environment by sensor type. Environments sharing a name
/// are counted together.
pub fn type_proportion(
    environments: &[Environment],
    source: SensorTypeSource,
    type_index: &HashMap<String, String>,
) -> Result<Vec<EnvironmentTypeCount>, ReportError> {
    // ---
    let mut table: HashMap<&str, BTreeMap<&str, u64>> = HashMap::new();

    for env in environments {
        for sensor in &env.sensors {
            let sensor_type = match source {
                SensorTypeSource::Embedded => sensor.sensor_type.as_deref().ok_or_else(|| {
                    ReportError::Malformed(format!(
                        "environment {} sensor {} has no sensorType",
                        env.id, sensor.sensor_id
                    ))
                })?,
                SensorTypeSource::Joined => type_index
                    .get(&sensor.sensor_id)
                    .map(String::as_str)
                    .unwrap_or(UNKNOWN_LABEL),
            };
            *table
                .entry(env.name.as_str())
                .or_default()
                .entry(sensor_type)
                .or_default() += 1;
        }
    }

    if table.is_empty() {
        return Err(ReportError::not_found("no environment sensor data"));
    }

    let mut groups: Vec<(&str, u64, BTreeMap<&str, u64>)> = table
        .into_iter()
        .map(|(name, types)| (name, types.values().sum(), types))
        .collect();
    groups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    Ok(groups
        .into_iter()
        .flat_map(|(name, _, types)| {
            types.into_iter().map(move |(sensor_type, count)| EnvironmentTypeCount {
                environment_name: name.to_string(),
                sensor_type: sensor_type.to_string(),
                count,
            })
        })
        .collect())
}
