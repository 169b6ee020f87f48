// src/error.rs
use chrono::NaiveDate;

use crate::models::Indicator;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Not enough data: {rows} row(s) in range, at least 2 are needed")]
    InsufficientData { rows: usize },

    #[error("Percent change is undefined: previous {indicator} value is zero")]
    DivisionByZero { indicator: Indicator },

    #[error("Volatility is undefined: no month in the window has two or more observations")]
    EmptyVolatilityWindow,

    #[error("Export failed: {0}")]
    ExportEncoding(String),

    #[error("Offset for {field} must be within [{min}, {max}], got {value}")]
    InvalidOffset {
        field: Indicator,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Start date {date} must be within [{min}, {max}]")]
    InvalidStartDate {
        date: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl DashboardError {
    /// Errors that are shown inline on the dashboard rather than rejecting the request.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DashboardError::InsufficientData { .. }
                | DashboardError::DivisionByZero { .. }
                | DashboardError::EmptyVolatilityWindow
        )
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
