use log::info;
use warp::Filter;
use std::net::SocketAddr;
use std::sync::Arc;

use macro_scenario_dashboard::config::AppConfig;
use macro_scenario_dashboard::routes::{self, AppState};
use macro_scenario_dashboard::services::store::BaselineStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = AppConfig::from_env()?;

    // Bind to 0.0.0.0 so the dashboard is reachable from outside a container
    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Will bind to: {}", addr);

    // Generate the baseline once, before the first request
    let state = Arc::new(AppState::new(BaselineStore::new(config.seed), config.lookback_days));
    let rows = state.store.table(state.today()).len();
    if let Some(at) = state.store.generated_at() {
        info!("Baseline generated at {} with {} monthly rows", at, rows);
    }

    // Set up CORS
    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET"]);

    // Set up routes
    let api = routes::routes(state).with(cors);
    info!("Routes configured successfully with CORS.");

    // Start the server
    info!("Starting server on {}", addr);
    warp::serve(api)
        .run(addr)
        .await;

    Ok(())
}
