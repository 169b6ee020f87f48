// src/handlers/query.rs
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::Result;
use crate::models::{ExportFormat, Indicator, ScenarioOffsets};
use crate::services::filter::{default_start, validate_start_date};

/// Query string shared by the dashboard and export endpoints.
/// Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    pub indicator: Option<Indicator>,
    pub start: Option<NaiveDate>,
    pub inflation: Option<f64>,
    pub interest_rate: Option<f64>,
    pub unemployment: Option<f64>,
    pub fx_rate: Option<f64>,
    pub format: Option<ExportFormat>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardInputs {
    pub indicator: Indicator,
    pub start: NaiveDate,
    pub offsets: ScenarioOffsets,
    pub format: ExportFormat,
}

impl DashboardQuery {
    /// Fill in defaults and validate against `today`.
    pub fn resolve(&self, today: NaiveDate, lookback_days: i64) -> Result<DashboardInputs> {
        let offsets = ScenarioOffsets {
            inflation: self.inflation.unwrap_or(0.0),
            interest_rate: self.interest_rate.unwrap_or(0.0),
            unemployment: self.unemployment.unwrap_or(0.0),
            fx_rate: self.fx_rate.unwrap_or(0.0),
        };
        offsets.validate()?;

        let start = match self.start {
            Some(start) => validate_start_date(start, today)?,
            None => default_start(today, lookback_days),
        };

        Ok(DashboardInputs {
            indicator: self.indicator.unwrap_or_default(),
            start,
            offsets,
            format: self.format.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_defaults() {
        let inputs = DashboardQuery::default().resolve(date(2025, 6, 1), 365).unwrap();
        assert_eq!(inputs.indicator, Indicator::Gdp);
        assert_eq!(inputs.start, date(2024, 6, 1));
        assert_eq!(inputs.offsets, ScenarioOffsets::default());
        assert_eq!(inputs.format, ExportFormat::Csv);
    }

    #[test]
    fn test_default_start_is_clamped_to_epoch() {
        let inputs = DashboardQuery::default().resolve(date(2020, 5, 1), 365).unwrap();
        assert_eq!(inputs.start, date(2020, 1, 1));
    }

    #[test]
    fn test_huge_lookback_falls_back_to_epoch() {
        let inputs = DashboardQuery::default().resolve(date(2025, 1, 1), 1_000_000_000).unwrap();
        assert_eq!(inputs.start, date(2020, 1, 1));
    }

    #[test]
    fn test_parses_query_string() {
        let query: DashboardQuery = serde_urlencoded::from_str(
            "indicator=fx_rate&start=2023-02-01&inflation=1.5&fx_rate=-0.3&format=xlsx",
        )
        .unwrap();
        let inputs = query.resolve(date(2025, 1, 1), 365).unwrap();
        assert_eq!(inputs.indicator, Indicator::FxRate);
        assert_eq!(inputs.start, date(2023, 2, 1));
        assert_eq!(inputs.offsets.inflation, 1.5);
        assert_eq!(inputs.offsets.fx_rate, -0.3);
        assert_eq!(inputs.format, ExportFormat::Xlsx);
    }

    #[test]
    fn test_rejects_out_of_range_inputs() {
        let today = date(2025, 1, 1);
        let too_far = DashboardQuery { interest_rate: Some(3.5), ..Default::default() };
        assert!(matches!(too_far.resolve(today, 365), Err(DashboardError::InvalidOffset { .. })));

        let future = DashboardQuery { start: Some(date(2025, 1, 2)), ..Default::default() };
        assert!(matches!(future.resolve(today, 365), Err(DashboardError::InvalidStartDate { .. })));
    }
}
