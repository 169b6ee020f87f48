// src/routes.rs
use std::sync::Arc;
use chrono::{NaiveDate, Utc};
use warp::reject::Rejection;
use crate::handlers::{dashboard::get_dashboard, export::get_export, query::DashboardQuery,
                     series::get_indicators, series::get_series};
use crate::services::store::BaselineStore;
use log::{info, warn};

use std::convert::Infallible;
use warp::{Filter, Reply};
use crate::handlers::error::ApiError;

/// State shared by every request: the memoized baseline and request defaults.
#[derive(Debug)]
pub struct AppState {
    pub store: BaselineStore,
    pub lookback_days: i64,
    as_of: Option<NaiveDate>,
}

impl AppState {
    pub fn new(store: BaselineStore, lookback_days: i64) -> Self {
        AppState {
            store,
            lookback_days,
            as_of: None,
        }
    }

    /// Pin "today" to a fixed date instead of the wall clock.
    pub fn with_as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = Some(date);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Utc::now().date_naive())
    }
}

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = e.to_string();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = warp::http::StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else {
        warn!("Unhandled rejection: {:?}", err);
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(state: Arc<AppState>) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let state_filter = warp::any().map(move || state.clone());

    let dashboard_route = warp::path!("api" / "v1" / "dashboard")
        .and(warp::get())
        .and(warp::query::<DashboardQuery>())
        .and(state_filter.clone())
        .and_then(get_dashboard);

    let series_route = warp::path!("api" / "v1" / "series")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_series);

    let indicators_route = warp::path!("api" / "v1" / "indicators")
        .and(warp::get())
        .and_then(get_indicators);

    let export_route = warp::path!("api" / "v1" / "export")
        .and(warp::get())
        .and(warp::query::<DashboardQuery>())
        .and(state_filter.clone())
        .and_then(get_export);

    info!("All routes configured successfully.");

    dashboard_route
        .or(series_route)
        .or(indicators_route)
        .or(export_route)
        .recover(handle_rejection)
}
