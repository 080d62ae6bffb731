//! Report aggregations.
//!
//! Every report is a pure function from store projections to a small table.
//! The functions know nothing about HTTP or chart formats; the route layer
//! pairs each one with a renderer from [`crate::charts`].

use std::{fmt, str::FromStr};

pub mod assignment;
pub mod census;
pub mod sensor_averages;
pub mod top_users;
pub mod type_proportion;

pub use assignment::{assignment_ratio, AssignmentSlice};
pub use census::sensor_type_census;
pub use sensor_averages::{sensor_averages, SensorAverages};
pub use top_users::top_users;
pub use type_proportion::{type_proportion, EnvironmentTypeCount};

/// Label used wherever an id cannot be resolved to a display value.
pub const UNKNOWN_LABEL: &str = "Desconocido";

/// Where the per-environment report takes each sensor's type from.
///
/// The two can disagree when a sensor's recorded type changes after it was
/// assigned to an environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SensorTypeSource {
    /// Type stored on the environment's own sensor entry.
    #[default]
    Embedded,
    /// Type looked up in the sensor records by `sensorId`.
    Joined,
}

impl FromStr for SensorTypeSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "embedded" => Ok(SensorTypeSource::Embedded),
            "joined" => Ok(SensorTypeSource::Joined),
            other => Err(format!("expected `embedded` or `joined`, got `{other}`")),
        }
    }
}

impl fmt::Display for SensorTypeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorTypeSource::Embedded => f.write_str("embedded"),
            SensorTypeSource::Joined => f.write_str("joined"),
        }
    }
}
