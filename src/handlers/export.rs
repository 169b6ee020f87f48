// src/handlers/export.rs
use std::sync::Arc;
use warp::http::{header, Response};
use warp::Rejection;
use log::{error, info, warn};

use crate::routes::AppState;
use crate::services::dashboard::scenario_table;
use crate::services::export::export_table;
use super::error::ApiError;
use super::query::DashboardQuery;

/// Download the filtered, adjusted table as CSV or XLSX.
pub async fn get_export(query: DashboardQuery, state: Arc<AppState>) -> Result<Response<Vec<u8>>, Rejection> {
    info!("Handling request to export data");

    let today = state.today();
    let inputs = query.resolve(today, state.lookback_days).map_err(|e| {
        warn!("Rejected export query {:?}: {}", query, e);
        warp::reject::custom(ApiError::from(e))
    })?;

    let table = scenario_table(state.store.table(today), &inputs.offsets, inputs.start);
    let file = export_table(&table, inputs.format).map_err(|e| {
        error!("Export failed: {}", e);
        warp::reject::custom(ApiError::from(e))
    })?;

    Response::builder()
        .header(header::CONTENT_TYPE, file.mime_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.file_name),
        )
        .body(file.bytes)
        .map_err(|e| {
            error!("Failed to build export response: {}", e);
            warp::reject::custom(ApiError::new(e.to_string()))
        })
}
