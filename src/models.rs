// src/models.rs
use serde::{Serialize, Deserialize};
use chrono::NaiveDate;
use std::fmt;

/// The five tracked economic series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    Gdp,
    Inflation,
    InterestRate,
    Unemployment,
    FxRate,
}

impl Indicator {
    pub const ALL: [Indicator; 5] = [
        Indicator::Gdp,
        Indicator::Inflation,
        Indicator::InterestRate,
        Indicator::Unemployment,
        Indicator::FxRate,
    ];

    /// Column name, as used in CSV headers and query strings.
    pub fn key(&self) -> &'static str {
        match self {
            Indicator::Gdp => "gdp",
            Indicator::Inflation => "inflation",
            Indicator::InterestRate => "interest_rate",
            Indicator::Unemployment => "unemployment",
            Indicator::FxRate => "fx_rate",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Indicator::Gdp => "GDP",
            Indicator::Inflation => "Inflation",
            Indicator::InterestRate => "Interest rate",
            Indicator::Unemployment => "Unemployment",
            Indicator::FxRate => "Exchange rate",
        }
    }

    pub fn value(&self, record: &MacroRecord) -> f64 {
        match self {
            Indicator::Gdp => record.gdp,
            Indicator::Inflation => record.inflation,
            Indicator::InterestRate => record.interest_rate,
            Indicator::Unemployment => record.unemployment,
            Indicator::FxRate => record.fx_rate,
        }
    }
}

impl Default for Indicator {
    fn default() -> Self {
        Indicator::Gdp
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// One monthly observation. Field order is the export column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroRecord {
    pub date: NaiveDate,
    pub gdp: f64,
    pub inflation: f64,
    pub interest_rate: f64,
    pub unemployment: f64,
    pub fx_rate: f64,
}

/// Rows ordered by `date` ascending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSeriesTable {
    pub rows: Vec<MacroRecord>,
}

impl TimeSeriesTable {
    pub fn new(rows: Vec<MacroRecord>) -> Self {
        TimeSeriesTable { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }

    pub fn values(&self, indicator: Indicator) -> Vec<f64> {
        self.rows.iter().map(|r| indicator.value(r)).collect()
    }
}

/// Additive what-if deltas. `gdp` has no offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOffsets {
    #[serde(default)]
    pub inflation: f64,
    #[serde(default)]
    pub interest_rate: f64,
    #[serde(default)]
    pub unemployment: f64,
    #[serde(default)]
    pub fx_rate: f64,
}

/// Inclusive slider range for one adjustable indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OffsetBounds {
    pub indicator: Indicator,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

pub const OFFSET_STEP: f64 = 0.1;

pub const OFFSET_BOUNDS: [OffsetBounds; 4] = [
    OffsetBounds { indicator: Indicator::Inflation, min: -5.0, max: 5.0, step: OFFSET_STEP },
    OffsetBounds { indicator: Indicator::InterestRate, min: -3.0, max: 3.0, step: OFFSET_STEP },
    OffsetBounds { indicator: Indicator::Unemployment, min: -2.0, max: 2.0, step: OFFSET_STEP },
    OffsetBounds { indicator: Indicator::FxRate, min: -3.0, max: 3.0, step: OFFSET_STEP },
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiSnapshot {
    pub latest_value: f64,
    pub change_pct: f64,
    /// `None` when the volatility window has no month with two or more rows.
    pub volatility: Option<f64>,
}

/// Display colouring for a period-over-period change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeTier {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAlert {
    SignificantIncrease,
    Moderate,
    SignificantDecrease,
}

impl ChangeAlert {
    pub fn message(&self) -> &'static str {
        match self {
            ChangeAlert::SignificantIncrease => "The indicator shows a significant increase.",
            ChangeAlert::SignificantDecrease => "The indicator has dropped considerably.",
            ChangeAlert::Moderate => "Moderate change in the indicator.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[serde(alias = "CSV")]
    Csv,
    #[serde(alias = "excel", alias = "spreadsheet")]
    Xlsx,
}

impl Default for ExportFormat {
    fn default() -> Self {
        ExportFormat::Csv
    }
}

impl ExportFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "datos_macro.csv",
            ExportFormat::Xlsx => "datos_macro.xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}
