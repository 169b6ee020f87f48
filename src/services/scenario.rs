// src/services/scenario.rs
use log::debug;

use crate::error::{DashboardError, Result};
use crate::models::{Indicator, ScenarioOffsets, TimeSeriesTable, OFFSET_BOUNDS};

impl ScenarioOffsets {
    pub fn get(&self, indicator: Indicator) -> Option<f64> {
        match indicator {
            Indicator::Gdp => None,
            Indicator::Inflation => Some(self.inflation),
            Indicator::InterestRate => Some(self.interest_rate),
            Indicator::Unemployment => Some(self.unemployment),
            Indicator::FxRate => Some(self.fx_rate),
        }
    }

    pub fn is_zero(&self) -> bool {
        OFFSET_BOUNDS
            .iter()
            .all(|b| self.get(b.indicator) == Some(0.0))
    }

    /// Reject offsets that are not finite or fall outside the slider range.
    pub fn validate(&self) -> Result<()> {
        for bounds in OFFSET_BOUNDS.iter() {
            let value = self.get(bounds.indicator).unwrap_or(0.0);
            if !value.is_finite() || value < bounds.min || value > bounds.max {
                return Err(DashboardError::InvalidOffset {
                    field: bounds.indicator,
                    value,
                    min: bounds.min,
                    max: bounds.max,
                });
            }
        }
        Ok(())
    }

    pub fn negated(&self) -> Self {
        ScenarioOffsets {
            inflation: -self.inflation,
            interest_rate: -self.interest_rate,
            unemployment: -self.unemployment,
            fx_rate: -self.fx_rate,
        }
    }
}

/// Return a copy of `table` with each offset added to its column in every row.
/// `date` and `gdp` are copied through untouched.
pub fn apply_offsets(table: &TimeSeriesTable, offsets: &ScenarioOffsets) -> TimeSeriesTable {
    if offsets.is_zero() {
        return table.clone();
    }
    debug!("Applying scenario offsets {:?} to {} rows", offsets, table.len());

    let rows = table
        .rows
        .iter()
        .map(|r| {
            let mut row = r.clone();
            row.inflation += offsets.inflation;
            row.interest_rate += offsets.interest_rate;
            row.unemployment += offsets.unemployment;
            row.fx_rate += offsets.fx_rate;
            row
        })
        .collect();

    TimeSeriesTable::new(rows)
}
