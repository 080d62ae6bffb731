//! Assigned vs. unassigned sensors.
//!
//! `assigned` is the number of distinct sensor ids referenced by any
//! environment. `unassigned` is the number of sensor entries across all
//! sensor records minus `assigned`. Entries are counted per occurrence, so a
//! sensor id repeated across (or within) records inflates the total, and an
//! environment referencing an id no record knows about inflates `assigned`.
//! Either can push `unassigned` below zero; the value is reported as is.

use std::{collections::HashSet, f64::consts::TAU};

use serde::Serialize;

use crate::error::ReportError;

// ---

pub const ASSIGNED: &str = "Assigned";
pub const UNASSIGNED: &str = "Unassigned";

const ASSIGNED_COLOR: &str = "#3182bd";
const UNASSIGNED_COLOR: &str = "#6baed6";

/// One slice of the assignment pie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentSlice {
    // ---
    pub category: &'static str,
    pub value: i64,
    /// Share of the full circle, in radians.
    pub angle: f64,
    pub color: &'static str,
}

/// Build the two-slice assignment breakdown.
///
/// `assigned_ids` are the sensor ids referenced from environments (duplicates
/// allowed), `sensor_entries` the number of sensor entries across all sensor
/// records.
pub fn assignment_ratio<A>(
    assigned_ids: A,
    sensor_entries: u64,
) -> Result<Vec<AssignmentSlice>, ReportError>
where
    A: IntoIterator,
    A::Item: AsRef<str>,
{
    // ---
    let total = sensor_entries as i64;
    if total == 0 {
        return Err(ReportError::not_found("no sensor data"));
    }

    let distinct: HashSet<String> = assigned_ids
        .into_iter()
        .map(|id| id.as_ref().to_string())
        .collect();
    let assigned = distinct.len() as i64;
    let unassigned = total - assigned;

    if unassigned < 0 {
        tracing::warn!(
            "Assignment counts inconsistent: {} distinct assigned ids but only {} sensor entries",
            assigned,
            total
        );
    }

    let slices = [(ASSIGNED, assigned, ASSIGNED_COLOR), (UNASSIGNED, unassigned, UNASSIGNED_COLOR)];
    let sum: i64 = slices.iter().map(|(_, v, _)| v).sum();

    Ok(slices
        .into_iter()
        .map(|(category, value, color)| AssignmentSlice {
            category,
            value,
            angle: value as f64 / sum as f64 * TAU,
            color,
        })
        .collect())
}
