// src/services/dashboard.rs
use chrono::NaiveDate;
use serde::Serialize;
use log::{debug, warn};

use crate::error::DashboardError;
use crate::models::{
    ChangeAlert, ChangeTier, Indicator, KpiSnapshot, MacroRecord, ScenarioOffsets, TimeSeriesTable,
};
use super::calculations::{
    calculate_kpis, change_alert, classify_change, correlation_matrix, histogram, CorrelationMatrix,
    HistogramBin, HISTOGRAM_BINS,
};
use super::filter::filter_from;
use super::scenario::apply_offsets;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    InsufficientData,
    DivisionByZero,
    EmptyVolatilityWindow,
}

/// A recovered error shown inline next to the metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub message: String,
}

impl StatusMessage {
    fn from_error(e: &DashboardError) -> Option<Self> {
        let kind = match e {
            DashboardError::InsufficientData { .. } => StatusKind::InsufficientData,
            DashboardError::DivisionByZero { .. } => StatusKind::DivisionByZero,
            DashboardError::EmptyVolatilityWindow => StatusKind::EmptyVolatilityWindow,
            _ => return None,
        };
        Some(StatusMessage {
            kind,
            message: e.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiView {
    #[serde(flatten)]
    pub snapshot: KpiSnapshot,
    pub tier: ChangeTier,
    pub alert: ChangeAlert,
    pub alert_message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub indicator: Indicator,
    pub indicator_label: &'static str,
    pub start_date: NaiveDate,
    pub offsets: ScenarioOffsets,
    pub row_count: usize,
    pub kpis: Option<KpiView>,
    pub status: Vec<StatusMessage>,
    pub series: Vec<SeriesPoint>,
    pub histogram: Vec<HistogramBin>,
    pub correlation: CorrelationMatrix,
    pub rows: Vec<MacroRecord>,
}

/// The adjusted table narrowed to `start`, i.e. what the user sees and exports.
pub fn scenario_table(
    baseline: &TimeSeriesTable,
    offsets: &ScenarioOffsets,
    start: NaiveDate,
) -> TimeSeriesTable {
    filter_from(&apply_offsets(baseline, offsets), start)
}

/// Build everything the dashboard shows for one set of inputs.
///
/// Never fails: KPI errors become entries in `status`.
pub fn render(
    baseline: &TimeSeriesTable,
    offsets: &ScenarioOffsets,
    start: NaiveDate,
    indicator: Indicator,
    today: NaiveDate,
) -> DashboardView {
    let adjusted = apply_offsets(baseline, offsets);
    let filtered = filter_from(&adjusted, start);
    debug!(
        "Rendering {} from {}: {} of {} rows",
        indicator,
        start,
        filtered.len(),
        adjusted.len()
    );

    let mut status = Vec::new();
    let kpis = match calculate_kpis(&filtered, &adjusted, indicator, start, today) {
        Ok(snapshot) => {
            if snapshot.volatility.is_none() {
                status.extend(StatusMessage::from_error(&DashboardError::EmptyVolatilityWindow));
            }
            let alert = change_alert(snapshot.change_pct);
            Some(KpiView {
                snapshot,
                tier: classify_change(snapshot.change_pct),
                alert,
                alert_message: alert.message(),
            })
        }
        Err(e) => {
            warn!("KPIs unavailable for {}: {}", indicator, e);
            status.extend(StatusMessage::from_error(&e));
            None
        }
    };

    let series = filtered
        .rows
        .iter()
        .map(|r| SeriesPoint {
            date: r.date,
            value: indicator.value(r),
        })
        .collect();

    DashboardView {
        indicator,
        indicator_label: indicator.label(),
        start_date: start,
        offsets: *offsets,
        row_count: filtered.len(),
        kpis,
        status,
        series,
        histogram: histogram(&filtered.values(indicator), HISTOGRAM_BINS),
        correlation: correlation_matrix(&filtered),
        rows: filtered.rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::generator::generate_with_seed;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_render_applies_offsets_and_filter() {
        let today = date(2025, 3, 10);
        let baseline = generate_with_seed(today, Some(21));
        let offsets = ScenarioOffsets { interest_rate: -1.0, ..Default::default() };
        let view = render(&baseline, &offsets, date(2024, 3, 10), Indicator::InterestRate, today);

        assert_eq!(view.row_count, 12);
        assert_eq!(view.rows.len(), 12);
        assert_eq!(view.series.len(), 12);
        assert_eq!(view.series[0].date, date(2024, 3, 31));

        let last = baseline.rows.last().unwrap();
        let kpis = view.kpis.expect("kpis");
        assert_relative_eq!(kpis.snapshot.latest_value, last.interest_rate - 1.0);
        assert_eq!(kpis.tier, classify_change(kpis.snapshot.change_pct));
        assert_eq!(view.histogram.iter().map(|b| b.count).sum::<usize>(), 12);
    }

    #[test]
    fn test_monthly_baseline_reports_undefined_volatility() {
        let today = date(2025, 3, 10);
        let baseline = generate_with_seed(today, Some(21));
        let view = render(&baseline, &ScenarioOffsets::default(), date(2023, 1, 1), Indicator::Gdp, today);

        let kpis = view.kpis.expect("kpis");
        assert!(kpis.snapshot.volatility.is_none());
        assert_eq!(view.status.len(), 1);
        assert_eq!(view.status[0].kind, StatusKind::EmptyVolatilityWindow);
    }

    #[test]
    fn test_start_after_last_row_reports_insufficient_data() {
        let today = date(2025, 3, 10);
        let baseline = generate_with_seed(today, Some(21));
        let view = render(&baseline, &ScenarioOffsets::default(), date(2025, 3, 1), Indicator::FxRate, today);

        assert!(view.kpis.is_none());
        assert_eq!(view.row_count, 0);
        assert!(view.histogram.is_empty());
        assert_eq!(view.status[0].kind, StatusKind::InsufficientData);
    }

    #[test]
    fn test_zero_previous_value_reports_division_by_zero() {
        let today = date(2024, 4, 10);
        let record = |date, inflation| MacroRecord {
            date,
            gdp: 100.0,
            inflation,
            interest_rate: 6.0,
            unemployment: 3.5,
            fx_rate: 20.0,
        };
        let baseline = TimeSeriesTable::new(vec![
            record(date(2024, 1, 31), 4.0),
            record(date(2024, 2, 29), -1.0),
            record(date(2024, 3, 31), 2.0),
        ]);
        // The +1.0 scenario shifts February's inflation to exactly zero.
        let offsets = ScenarioOffsets { inflation: 1.0, ..Default::default() };
        let view = render(&baseline, &offsets, date(2024, 1, 1), Indicator::Inflation, today);

        assert!(view.kpis.is_none());
        assert_eq!(view.row_count, 3);
        assert_eq!(view.status.len(), 1);
        assert_eq!(view.status[0].kind, StatusKind::DivisionByZero);
        assert_eq!(view.series.len(), 3);
    }

    #[test]
    fn test_baseline_is_untouched() {
        let today = date(2025, 3, 10);
        let baseline = generate_with_seed(today, Some(21));
        let before = baseline.clone();
        let offsets = ScenarioOffsets { inflation: 5.0, unemployment: -2.0, ..Default::default() };
        let _ = render(&baseline, &offsets, date(2020, 1, 1), Indicator::Inflation, today);
        assert_eq!(baseline, before);
    }

    #[test]
    fn test_view_serializes_flat_kpis() {
        let today = date(2025, 3, 10);
        let baseline = generate_with_seed(today, Some(21));
        let view = render(&baseline, &ScenarioOffsets::default(), date(2024, 1, 1), Indicator::Gdp, today);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["indicator"], "gdp");
        assert!(json["kpis"]["latest_value"].is_number());
        assert!(json["kpis"]["volatility"].is_null());
        assert_eq!(json["rows"][0]["date"], "2024-01-31");
    }
}
