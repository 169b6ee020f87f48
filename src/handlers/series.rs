// src/handlers/series.rs
use std::sync::Arc;
use serde::Serialize;
use warp::reply::Json;
use warp::Rejection;
use log::info;

use crate::models::{Indicator, OffsetBounds, OFFSET_BOUNDS};
use crate::routes::AppState;

#[derive(Serialize)]
struct IndicatorInfo {
    key: &'static str,
    label: &'static str,
}

#[derive(Serialize)]
struct CatalogueResponse {
    indicators: Vec<IndicatorInfo>,
    offsets: Vec<OffsetBounds>,
}

/// The unadjusted baseline table.
pub async fn get_series(state: Arc<AppState>) -> Result<Json, Rejection> {
    info!("Handling request to get the baseline series");
    let table = state.store.table(state.today());
    Ok(warp::reply::json(table))
}

pub async fn get_indicators() -> Result<Json, Rejection> {
    let response = CatalogueResponse {
        indicators: Indicator::ALL
            .iter()
            .map(|i| IndicatorInfo { key: i.key(), label: i.label() })
            .collect(),
        offsets: OFFSET_BOUNDS.to_vec(),
    };
    Ok(warp::reply::json(&response))
}
