//! Average number of sensors per environment, per user, summarised as a
//! box plot.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{error::ReportError, models::Environment};

// ---

/// Mean sensors-per-environment for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAverage {
    // ---
    pub user_id: String,
    pub environment_count: u64,
    pub mean_sensors: f64,
}

/// Five-number summary plus Tukey fences over a set of values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxSummary {
    // ---
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
    /// Smallest value inside the fences.
    pub lower_whisker: f64,
    /// Largest value inside the fences.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorAverages {
    /// One entry per user owning at least one environment, ordered by user id.
    pub per_user: Vec<UserAverage>,
    pub summary: BoxSummary,
}

impl SensorAverages {
    pub fn means(&self) -> Vec<f64> {
        self.per_user.iter().map(|u| u.mean_sensors).collect()
    }
}

/// Compute each user's mean sensor count per environment and summarise the
/// distribution of those means.
pub fn sensor_averages(environments: &[Environment]) -> Result<SensorAverages, ReportError> {
    // ---
    if environments.is_empty() {
        return Err(ReportError::not_found("no environment data"));
    }

    // user_id -> (environments, sensors)
    let mut totals: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for env in environments {
        let entry = totals.entry(env.user_id.as_str()).or_default();
        entry.0 += 1;
        entry.1 += env.sensor_count() as u64;
    }

    let per_user: Vec<UserAverage> = totals
        .into_iter()
        .map(|(user_id, (envs, sensors))| UserAverage {
            user_id: user_id.to_string(),
            environment_count: envs,
            mean_sensors: sensors as f64 / envs as f64,
        })
        .collect();

    let means: Vec<f64> = per_user.iter().map(|u| u.mean_sensors).collect();
    let summary = box_summary(&means)
        .ok_or_else(|| ReportError::not_found("no environment data"))?;

    Ok(SensorAverages { per_user, summary })
}

/// Summarise `values`. Returns `None` for an empty slice.
///
/// Quartiles interpolate linearly between the closest ranks.
pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    // ---
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let lower_fence = q1 - 1.5 * iqr;
    let upper_fence = q3 + 1.5 * iqr;

    let (inside, outliers): (Vec<f64>, Vec<f64>) = sorted
        .iter()
        .copied()
        .partition(|&v| v >= lower_fence && v <= upper_fence);

    // The median always lies inside the fences, so `inside` is never empty
    let lower_whisker = inside.first().copied().unwrap_or(median);
    let upper_whisker = inside.last().copied().unwrap_or(median);

    Some(BoxSummary {
        count: sorted.len(),
        min: sorted[0],
        q1,
        median,
        q3,
        max: sorted[sorted.len() - 1],
        lower_fence,
        upper_fence,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    // ---
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::EnvironmentSensor;

    fn env(id: usize, user_id: &str, sensors: usize) -> Environment {
        Environment {
            id: format!("env-{id}"),
            name: format!("Environment {id}"),
            user_id: user_id.to_string(),
            sensors: (0..sensors)
                .map(|n| EnvironmentSensor {
                    sensor_id: format!("s-{id}-{n}"),
                    sensor_type: Some("temp".into()),
                })
                .collect(),
        }
    }

    #[test]
    fn test_one_mean_per_user() {
        // ---
        let envs = vec![env(1, "u1", 2), env(2, "u1", 4), env(3, "u2", 1), env(4, "u3", 0)];
        let report = sensor_averages(&envs).unwrap();

        assert_eq!(report.per_user.len(), 3);
        assert_eq!(report.per_user[0].user_id, "u1");
        assert_eq!(report.per_user[0].environment_count, 2);
        assert_eq!(report.per_user[0].mean_sensors, 3.0);
        assert_eq!(report.means(), vec![3.0, 1.0, 0.0]);
        assert_eq!(report.summary.count, 3);
    }

    #[test]
    fn test_quartiles_interpolate() {
        // ---
        let s = box_summary(&[1.0, 2.0, 3.0, 4.0]).unwrap();

        assert_eq!(s.min, 1.0);
        assert_eq!(s.q1, 1.75);
        assert_eq!(s.median, 2.5);
        assert_eq!(s.q3, 3.25);
        assert_eq!(s.max, 4.0);
        assert!(s.outliers.is_empty());
        assert_eq!(s.lower_whisker, 1.0);
        assert_eq!(s.upper_whisker, 4.0);
    }

    #[test]
    fn test_summary_is_ordered() {
        // ---
        let s = box_summary(&[7.5, 0.0, 3.0, 3.0, 12.0, 1.25, 4.0]).unwrap();
        assert!(s.min <= s.q1 && s.q1 <= s.median && s.median <= s.q3 && s.q3 <= s.max);
    }

    #[test]
    fn test_outliers_use_tukey_fences() {
        // ---
        let s = box_summary(&[1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 20.0]).unwrap();

        // q1 = 2, q3 = 3.5, iqr = 1.5 -> fences at -0.25 and 5.75
        assert_eq!(s.q1, 2.0);
        assert_eq!(s.q3, 3.5);
        assert_eq!(s.upper_fence, 5.75);
        assert_eq!(s.outliers, vec![20.0]);
        assert_eq!(s.upper_whisker, 4.0);
        assert_eq!(s.max, 20.0);
    }

    #[test]
    fn test_single_user() {
        // ---
        let report = sensor_averages(&[env(1, "u1", 3)]).unwrap();
        let s = &report.summary;
        assert_eq!((s.min, s.q1, s.median, s.q3, s.max), (3.0, 3.0, 3.0, 3.0, 3.0));
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        // ---
        let report = sensor_averages(&[env(1, "u1", 2), env(2, "u2", 4)]).unwrap();
        let v = serde_json::to_value(&report).unwrap();

        assert_eq!(v["perUser"][0]["meanSensors"], 2.0);
        assert_eq!(v["summary"]["lowerWhisker"], 2.0);
        assert_eq!(v["summary"]["upperWhisker"], 4.0);
        assert!(v["summary"]["lowerFence"].is_number());
        assert!(v["summary"].get("upper_fence").is_none());
    }

    #[test]
    fn test_no_environments_is_not_found() {
        // ---
        assert!(matches!(sensor_averages(&[]), Err(ReportError::NotFound(_))));
        assert!(box_summary(&[]).is_none());
    }
}
