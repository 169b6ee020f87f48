// src/services/filter.rs
use chrono::{Days, NaiveDate};

use crate::error::{DashboardError, Result};
use crate::models::TimeSeriesTable;
use super::generator::series_epoch;

/// Rows dated on or after `start`, in their original order.
pub fn filter_from(table: &TimeSeriesTable, start: NaiveDate) -> TimeSeriesTable {
    // Rows are sorted, so everything from the first match onward qualifies.
    let first = table.rows.partition_point(|r| r.date < start);
    TimeSeriesTable::new(table.rows[first..].to_vec())
}

/// Check a user-chosen start date against `[epoch, today]`.
pub fn validate_start_date(start: NaiveDate, today: NaiveDate) -> Result<NaiveDate> {
    let min = series_epoch();
    if start < min || start > today {
        return Err(DashboardError::InvalidStartDate {
            date: start,
            min,
            max: today,
        });
    }
    Ok(start)
}

/// `lookback_days` before `today`, never earlier than the epoch.
pub fn default_start(today: NaiveDate, lookback_days: i64) -> NaiveDate {
    u64::try_from(lookback_days)
        .ok()
        .and_then(|days| today.checked_sub_days(Days::new(days)))
        .map_or(series_epoch(), |start| start.max(series_epoch()))
}
