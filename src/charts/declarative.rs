//! Declarative chart descriptions built with `serde_json`.
//!
//! Three dialects are produced: a wedge (pie) description, a plotly-style
//! box-plot figure and a Vega-Lite stacked bar specification. Each carries a
//! generation timestamp in a dialect-appropriate metadata slot; everything
//! else is a pure function of the input table.

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use super::ChartPayload;
use crate::reports::{AssignmentSlice, EnvironmentTypeCount, SensorAverages};

// ---

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";
const BOX_COLOR: &str = "indianred";

fn generated_at() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Pie of `slices`, each wedge spanning its cumulative angle range.
pub fn wedge_chart(title: &str, slices: &[AssignmentSlice]) -> ChartPayload {
    // ---
    let mut start = 0.0_f64;
    let wedges: Vec<Value> = slices
        .iter()
        .map(|s| {
            let end = start + s.angle;
            let wedge = json!({
                "category": s.category,
                "value": s.value,
                "start_angle": start,
                "end_angle": end,
                "color": s.color,
            });
            start = end;
            wedge
        })
        .collect();

    ChartPayload::DeclarativeSpec(json!({
        "kind": "wedge",
        "title": title,
        "height": 350,
        "x_range": [-1.0, 1.0],
        "center": {"x": 0.0, "y": 1.0},
        "radius": 0.4,
        "line_color": "white",
        "tooltip": "@category: @value",
        "wedges": wedges,
        "generated_at": generated_at(),
    }))
}

/// Box plot over the per-user means, with the computed summary attached.
pub fn box_plot(title: &str, averages: &SensorAverages) -> ChartPayload {
    // ---
    let user_ids: Vec<&str> = averages.per_user.iter().map(|u| u.user_id.as_str()).collect();

    ChartPayload::DeclarativeSpec(json!({
        "data": [{
            "type": "box",
            "name": "mean_sensors",
            "y": averages.means(),
            "text": user_ids,
            "boxpoints": "outliers",
            "marker": {"color": BOX_COLOR},
        }],
        "layout": {
            "title": {"text": title},
            "yaxis": {"title": {"text": "Mean sensors per environment"}},
            "meta": {"generated_at": generated_at()},
        },
        "summary": averages.summary,
    }))
}

/// Vega-Lite stacked bars: one bar per environment, stacked by sensor type.
pub fn stacked_bar(title: &str, rows: &[EnvironmentTypeCount]) -> ChartPayload {
    // ---
    // Rows arrive grouped by environment in display order
    let mut order: Vec<&str> = Vec::new();
    for row in rows {
        if order.last() != Some(&row.environment_name.as_str()) {
            order.push(&row.environment_name);
        }
    }

    ChartPayload::DeclarativeSpec(json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": title,
        "width": 700,
        "height": 400,
        "data": {"values": rows},
        "mark": "bar",
        "encoding": {
            "x": {"field": "environmentName", "type": "nominal", "sort": order, "title": "Environment"},
            "y": {"field": "count", "type": "quantitative", "aggregate": "sum", "title": "Sensors"},
            "color": {"field": "sensorType", "type": "nominal", "title": "Sensor type"},
            "tooltip": [
                {"field": "environmentName", "type": "nominal"},
                {"field": "sensorType", "type": "nominal"},
                {"field": "count", "type": "quantitative"},
            ],
        },
        "params": [{"name": "grid", "select": "interval", "bind": "scales"}],
        "usermeta": {"generated_at": generated_at()},
    }))
}
