//! The five report endpoints.
//!
//! Each handler fetches the projections it needs, runs one aggregation and
//! hands the table to one renderer. Failures bubble up as [`ReportError`],
//! whose `IntoResponse` applies the 404/500 contract.

use std::collections::HashMap;

use axum::{extract::State, routing::get, Router};
use tracing::{debug, info};

use super::AppState;
use crate::{
    charts::{
        declarative,
        raster::{self, Labels},
        ChartPayload,
    },
    error::ReportError,
    reports::{self, SensorTypeSource},
};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/plot1", get(sensor_type_census))
        .route("/plot2", get(assignment_ratio))
        .route("/plot3", get(top_users))
        .route("/plot4", get(sensor_averages))
        .route("/plot5", get(type_proportion))
}

/// `GET /plot1`: sensors per type, as a bar chart image.
async fn sensor_type_census(
    State(state): State<AppState>,
) -> Result<ChartPayload, ReportError> {
    // ---
    info!("GET /plot1 - sensor-type census");

    let types = state.store.sensor_types().await?;
    let rows = reports::sensor_type_census(&types)?;
    debug!("GET /plot1 - {} sensors across {} types", types.len(), rows.len());

    let bars: Vec<(String, u64)> = rows.into_iter().map(|r| (r.sensor_type, r.count)).collect();
    raster::vertical_bars(
        &Labels {
            title: "Sensors by type (global)",
            category: "Sensor type",
            value: "Count",
        },
        &bars,
        raster::CENSUS_COLOR,
    )
}

/// `GET /plot2`: assigned vs. unassigned sensors, as a wedge chart.
async fn assignment_ratio(State(state): State<AppState>) -> Result<ChartPayload, ReportError> {
    // ---
    info!("GET /plot2 - assignment ratio");

    let assigned_ids = state.store.environment_sensor_ids().await?;
    let sensor_entries = state.store.record_sensor_count().await?;
    let slices = reports::assignment_ratio(&assigned_ids, sensor_entries)?;
    debug!(
        "GET /plot2 - {} sensor entries, {} assigned",
        sensor_entries, slices[0].value
    );

    Ok(declarative::wedge_chart("Assigned vs. unassigned sensors", &slices))
}

/// `GET /plot3`: users with the most environments, as a bar chart image.
async fn top_users(State(state): State<AppState>) -> Result<ChartPayload, ReportError> {
    // ---
    info!("GET /plot3 - top users by environment count");

    let environments = state.store.environments().await?;
    // Nothing to rank; skip the users query
    if environments.is_empty() {
        return Err(ReportError::not_found("no environment data"));
    }
    let names = state.store.user_names().await?;
    let rows = reports::top_users(&environments, &names)?;
    debug!("GET /plot3 - ranking {} users", rows.len());

    let bars: Vec<(String, u64)> = rows
        .into_iter()
        .map(|r| (r.name, r.environment_count))
        .collect();
    raster::horizontal_bars(
        &Labels {
            title: "Top 15 users by environments",
            category: "User",
            value: "Environments",
        },
        &bars,
        raster::TOP_USERS_COLOR,
    )
}

/// `GET /plot4`: distribution of per-user mean sensors per environment.
async fn sensor_averages(State(state): State<AppState>) -> Result<ChartPayload, ReportError> {
    // ---
    info!("GET /plot4 - sensors per environment by user");

    let environments = state.store.environments().await?;
    let averages = reports::sensor_averages(&environments)?;
    debug!(
        "GET /plot4 - {} users, median {:.2}",
        averages.summary.count, averages.summary.median
    );

    Ok(declarative::box_plot(
        "Mean sensors per environment (by user)",
        &averages,
    ))
}

/// `GET /plot5`: sensor-type mix of each environment, as stacked bars.
async fn type_proportion(State(state): State<AppState>) -> Result<ChartPayload, ReportError> {
    // ---
    let source = state.config.sensor_type_source;
    info!("GET /plot5 - sensor types per environment ({} types)", source);

    let environments = state.store.environments().await?;
    let type_index = match source {
        SensorTypeSource::Embedded => HashMap::new(),
        SensorTypeSource::Joined => state.store.sensor_type_index().await?,
    };
    let rows = reports::type_proportion(&environments, source, &type_index)?;
    debug!("GET /plot5 - {} (environment, type) cells", rows.len());

    Ok(declarative::stacked_bar(
        "Sensor type proportion by environment",
        &rows,
    ))
}
