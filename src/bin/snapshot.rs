// src/bin/snapshot.rs
//
// Generate a baseline, print the KPIs for every indicator and write both
// export files to the current directory.
use std::fs;
use chrono::Utc;
use log::{error, info};

use macro_scenario_dashboard::config::AppConfig;
use macro_scenario_dashboard::models::{ExportFormat, Indicator, ScenarioOffsets};
use macro_scenario_dashboard::services::calculations::calculate_kpis;
use macro_scenario_dashboard::services::dashboard::scenario_table;
use macro_scenario_dashboard::services::export::export_table;
use macro_scenario_dashboard::services::filter::default_start;
use macro_scenario_dashboard::services::generator::generate_with_seed;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = AppConfig::from_env()?;

    let today = Utc::now().date_naive();
    let start = default_start(today, config.lookback_days);
    let baseline = generate_with_seed(today, config.seed);
    info!("Generated {} rows, reporting from {}", baseline.len(), start);

    let offsets = ScenarioOffsets::default();
    let filtered = scenario_table(&baseline, &offsets, start);

    for indicator in Indicator::ALL {
        match calculate_kpis(&filtered, &baseline, indicator, start, today) {
            Ok(kpis) => {
                let volatility = kpis
                    .volatility
                    .map(|v| format!("{:.3}", v))
                    .unwrap_or_else(|| "n/a".to_string());
                println!(
                    "{:<14} latest {:>9.2}  change {:>7.2}%  volatility {}",
                    indicator.label(),
                    kpis.latest_value,
                    kpis.change_pct,
                    volatility
                );
            }
            Err(e) => error!("{}: {}", indicator.label(), e),
        }
    }

    for format in [ExportFormat::Csv, ExportFormat::Xlsx] {
        let file = export_table(&filtered, format)?;
        fs::write(file.file_name, &file.bytes)?;
        println!("Wrote {} ({} bytes)", file.file_name, file.bytes.len());
    }

    Ok(())
}
