// src/handlers/dashboard.rs
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;
use log::{debug, info, warn};

use crate::routes::AppState;
use crate::services::dashboard::render;
use super::error::ApiError;
use super::query::DashboardQuery;

pub async fn get_dashboard(query: DashboardQuery, state: Arc<AppState>) -> Result<Json, Rejection> {
    info!("Handling request to render the dashboard");

    let today = state.today();
    let inputs = query.resolve(today, state.lookback_days).map_err(|e| {
        warn!("Rejected dashboard query {:?}: {}", query, e);
        warp::reject::custom(ApiError::from(e))
    })?;
    debug!("Resolved dashboard inputs: {:?}", inputs);

    let view = render(
        state.store.table(today),
        &inputs.offsets,
        inputs.start,
        inputs.indicator,
        today,
    );

    if !view.status.is_empty() {
        info!("Dashboard rendered with {} status message(s)", view.status.len());
    }
    Ok(warp::reply::json(&view))
}
