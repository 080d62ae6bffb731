//! Sensor-type census: how many sensors of each type exist across all
//! sensor records.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::ReportError;

// ---

/// One row of the census table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCount {
    // ---
    pub sensor_type: String,
    pub count: u64,
}

/// Count occurrences of each sensor type.
///
/// Rows are sorted by count descending; equal counts are ordered by type name
/// so repeated calls over the same data produce the same table.
pub fn sensor_type_census<I, S>(sensor_types: I) -> Result<Vec<TypeCount>, ReportError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    // ---
    let mut counts: HashMap<String, u64> = HashMap::new();
    for sensor_type in sensor_types {
        *counts.entry(sensor_type.as_ref().to_string()).or_default() += 1;
    }

    if counts.is_empty() {
        return Err(ReportError::not_found("no sensor data"));
    }

    let mut rows: Vec<TypeCount> = counts
        .into_iter()
        .map(|(sensor_type, count)| TypeCount { sensor_type, count })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.sensor_type.cmp(&b.sensor_type)));

    Ok(rows)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_counts_and_order() {
        // ---
        let rows = sensor_type_census(["temp", "temp", "hum"]).unwrap();

        assert_eq!(
            rows,
            vec![
                TypeCount { sensor_type: "temp".into(), count: 2 },
                TypeCount { sensor_type: "hum".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_counts_sum_to_total_and_types_match() {
        // ---
        let input = ["co2", "temp", "hum", "temp", "light", "co2", "temp", "hum"];
        let rows = sensor_type_census(input).unwrap();

        let total: u64 = rows.iter().map(|r| r.count).sum();
        assert_eq!(total, input.len() as u64);

        let seen: HashSet<&str> = rows.iter().map(|r| r.sensor_type.as_str()).collect();
        let expected: HashSet<&str> = input.iter().copied().collect();
        assert_eq!(seen, expected);

        assert!(rows.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_ties_are_ordered_by_type() {
        // ---
        let rows = sensor_type_census(["hum", "co2", "temp"]).unwrap();
        let order: Vec<&str> = rows.iter().map(|r| r.sensor_type.as_str()).collect();
        assert_eq!(order, ["co2", "hum", "temp"]);
    }

    #[test]
    fn test_no_sensors_is_not_found() {
        // ---
        let err = sensor_type_census(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, ReportError::NotFound(ref m) if m == "no sensor data"));
    }
}
