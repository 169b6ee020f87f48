// src/services/calculations.rs
use std::collections::BTreeMap;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use log::{debug, warn};

use crate::error::{DashboardError, Result};
use crate::models::{ChangeAlert, ChangeTier, Indicator, KpiSnapshot, TimeSeriesTable};
use super::filter::filter_from;

/// Volatility never looks back less than this many days.
pub const VOLATILITY_MIN_WINDOW_DAYS: i64 = 180;
pub const HISTOGRAM_BINS: usize = 20;

const TIER_THRESHOLD_PCT: f64 = 2.0;
const ALERT_THRESHOLD_PCT: f64 = 5.0;

fn calculate_average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n - 1). Undefined below two values.
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = calculate_average(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Percent change of the last row against the one before it.
pub fn percent_change(table: &TimeSeriesTable, indicator: Indicator) -> Result<f64> {
    let rows = &table.rows;
    if rows.len() < 2 {
        return Err(DashboardError::InsufficientData { rows: rows.len() });
    }
    let latest = indicator.value(&rows[rows.len() - 1]);
    let previous = indicator.value(&rows[rows.len() - 2]);
    if previous == 0.0 {
        return Err(DashboardError::DivisionByZero { indicator });
    }
    Ok((latest - previous) / previous * 100.0)
}

/// Start of the volatility window: the user's start date, pulled back so the
/// window spans at least `VOLATILITY_MIN_WINDOW_DAYS`.
pub fn volatility_window_start(start: NaiveDate, today: NaiveDate) -> NaiveDate {
    let min_window_start = today - Duration::days(VOLATILITY_MIN_WINDOW_DAYS);
    start.min(min_window_start)
}

/// Mean of the per-calendar-month sample standard deviations of `indicator`,
/// over rows of `adjusted` inside the volatility window. Months with a single
/// row have no standard deviation and are left out of the mean.
pub fn calculate_volatility(
    adjusted: &TimeSeriesTable,
    indicator: Indicator,
    start: NaiveDate,
    today: NaiveDate,
) -> Result<f64> {
    let window = filter_from(adjusted, volatility_window_start(start, today));

    let mut months: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
    for row in &window.rows {
        months
            .entry((row.date.year(), row.date.month()))
            .or_default()
            .push(indicator.value(row));
    }

    let stds: Vec<f64> = months.values().filter_map(|v| sample_std(v)).collect();
    debug!(
        "Volatility window for {}: {} rows, {} months, {} with a defined std",
        indicator,
        window.len(),
        months.len(),
        stds.len()
    );

    calculate_average(&stds).ok_or(DashboardError::EmptyVolatilityWindow)
}

/// Latest value, percent change and volatility for `indicator`.
///
/// `filtered` is the adjusted table narrowed to the user's start date;
/// `adjusted` is the same table before narrowing, used for the volatility
/// window.
pub fn calculate_kpis(
    filtered: &TimeSeriesTable,
    adjusted: &TimeSeriesTable,
    indicator: Indicator,
    start: NaiveDate,
    today: NaiveDate,
) -> Result<KpiSnapshot> {
    let change_pct = percent_change(filtered, indicator)?;
    let latest_value = filtered
        .rows
        .last()
        .map(|r| indicator.value(r))
        .ok_or(DashboardError::InsufficientData { rows: 0 })?;

    let volatility = match calculate_volatility(adjusted, indicator, start, today) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("{}", e);
            None
        }
    };

    Ok(KpiSnapshot {
        latest_value,
        change_pct,
        volatility,
    })
}

pub fn classify_change(change_pct: f64) -> ChangeTier {
    if change_pct > TIER_THRESHOLD_PCT {
        ChangeTier::Positive
    } else if change_pct < -TIER_THRESHOLD_PCT {
        ChangeTier::Negative
    } else {
        ChangeTier::Neutral
    }
}

pub fn change_alert(change_pct: f64) -> ChangeAlert {
    if change_pct > ALERT_THRESHOLD_PCT {
        ChangeAlert::SignificantIncrease
    } else if change_pct < -ALERT_THRESHOLD_PCT {
        ChangeAlert::SignificantDecrease
    } else {
        ChangeAlert::Moderate
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width bins spanning the min and max of `values`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        return vec![HistogramBin { lower: min, upper: max, count: finite.len() }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in &finite {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub indicators: Vec<Indicator>,
    /// Row-major; `None` where the correlation is undefined.
    pub values: Vec<Vec<Option<f64>>>,
}

fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mx = calculate_average(xs)?;
    let my = calculate_average(ys)?;
    let (mut cov, mut vx, mut vy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        cov += (x - mx) * (y - my);
        vx += (x - mx).powi(2);
        vy += (y - my).powi(2);
    }
    if vx == 0.0 || vy == 0.0 {
        return None;
    }
    Some((cov / (vx.sqrt() * vy.sqrt())).clamp(-1.0, 1.0))
}

/// Pairwise Pearson correlation between all indicator columns.
pub fn correlation_matrix(table: &TimeSeriesTable) -> CorrelationMatrix {
    let columns: Vec<Vec<f64>> = Indicator::ALL.iter().map(|i| table.values(*i)).collect();
    let values = columns
        .iter()
        .map(|xs| columns.iter().map(|ys| pearson(xs, ys)).collect())
        .collect();

    CorrelationMatrix {
        indicators: Indicator::ALL.to_vec(),
        values,
    }
}
