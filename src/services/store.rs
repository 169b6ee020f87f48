// src/services/store.rs
use std::sync::OnceLock;
use chrono::{DateTime, NaiveDate, Utc};
use log::info;

use crate::models::TimeSeriesTable;
use super::generator::generate_with_seed;

#[derive(Debug)]
struct Baseline {
    generated_at: DateTime<Utc>,
    table: TimeSeriesTable,
}

/// Holds the generated baseline table for the lifetime of the process.
///
/// The table is produced on first access and never replaced, so every
/// request sees the same pristine data. Scenario offsets are always
/// applied to copies.
#[derive(Debug)]
pub struct BaselineStore {
    seed: Option<u64>,
    baseline: OnceLock<Baseline>,
}

impl BaselineStore {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            seed,
            baseline: OnceLock::new(),
        }
    }

    /// The baseline table, generating it up to `today` on the first call.
    /// Later calls ignore `today` and return the memoized table.
    pub fn table(&self, today: NaiveDate) -> &TimeSeriesTable {
        &self
            .baseline
            .get_or_init(|| {
                let table = generate_with_seed(today, self.seed);
                info!("Baseline series ready: {} rows", table.len());
                Baseline {
                    generated_at: Utc::now(),
                    table,
                }
            })
            .table
    }

    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        self.baseline.get().map(|b| b.generated_at)
    }
}
