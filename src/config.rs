// src/config.rs
use std::env;
use anyhow::{Context, Result};
use dotenv::dotenv;
use log::{info, warn};

const DEFAULT_PORT: u16 = 3030;
const DEFAULT_LOOKBACK_DAYS: i64 = 365;
// A century; anything longer reaches back past the epoch anyway.
const MAX_LOOKBACK_DAYS: i64 = 36_500;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    /// Seed for the baseline series; `None` draws from entropy.
    pub seed: Option<u64>,
    /// How far back the default start date sits from today.
    pub lookback_days: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            port: DEFAULT_PORT,
            seed: None,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}

impl AppConfig {
    /// Load from `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(p) => p.trim().parse::<u16>().with_context(|| format!("PORT must be a number, got {:?}", p))?,
            None => {
                warn!("$PORT not set, defaulting to {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
        };

        let seed = lookup("DASHBOARD_SEED")
            .map(|s| s.trim().parse::<u64>().with_context(|| format!("DASHBOARD_SEED must be a u64, got {:?}", s)))
            .transpose()?;

        let lookback_days = match lookup("DASHBOARD_LOOKBACK_DAYS") {
            Some(d) => {
                let days = d
                    .trim()
                    .parse::<i64>()
                    .with_context(|| format!("DASHBOARD_LOOKBACK_DAYS must be a number, got {:?}", d))?;
                anyhow::ensure!(
                    (0..=MAX_LOOKBACK_DAYS).contains(&days),
                    "DASHBOARD_LOOKBACK_DAYS must be within [0, {}], got {}",
                    MAX_LOOKBACK_DAYS,
                    days
                );
                days
            }
            None => DEFAULT_LOOKBACK_DAYS,
        };

        let config = AppConfig { port, seed, lookback_days };
        info!("Loaded config: {:?}", config);
        Ok(config)
    }
}
