// src/services/generator.rs
use chrono::{Datelike, NaiveDate};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

use crate::models::{MacroRecord, TimeSeriesTable};

/// Per-column draw parameters. `level` turns the draws into a random walk
/// starting from that level (cumulative sum of increments plus the level).
#[derive(Debug, Clone, Copy)]
struct SeriesParams {
    mean: f64,
    std_dev: f64,
    level: Option<f64>,
}

impl SeriesParams {
    fn draw<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        let mut running = 0.0;
        (0..n)
            .map(|_| {
                let z: f64 = StandardNormal.sample(&mut *rng);
                let x = self.mean + self.std_dev * z;
                match self.level {
                    Some(level) => {
                        running += x;
                        running + level
                    }
                    None => x,
                }
            })
            .collect()
    }
}

const GDP: SeriesParams = SeriesParams { mean: 1.0, std_dev: 0.3, level: Some(100.0) };
const INFLATION: SeriesParams = SeriesParams { mean: 4.0, std_dev: 1.0, level: None };
const INTEREST_RATE: SeriesParams = SeriesParams { mean: 6.0, std_dev: 0.5, level: None };
const UNEMPLOYMENT: SeriesParams = SeriesParams { mean: 3.5, std_dev: 0.3, level: None };
const FX_RATE: SeriesParams = SeriesParams { mean: 0.1, std_dev: 0.5, level: Some(20.0) };

/// First day covered by the generated series.
pub fn series_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Month-end dates from the epoch month up to and including the last month-end on or before `today`.
pub fn month_ends(today: NaiveDate) -> Vec<NaiveDate> {
    let epoch = series_epoch();
    let (mut year, mut month) = (epoch.year(), epoch.month());
    let mut dates = Vec::new();

    while let Some(end) = month_end(year, month) {
        if end > today {
            break;
        }
        dates.push(end);
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    dates
}

/// Generate the synthetic monthly table ending at `today`.
///
/// Columns are drawn one after another in export order, so a seeded `rng`
/// always yields the same table for the same `today`.
pub fn generate_series<R: Rng + ?Sized>(today: NaiveDate, rng: &mut R) -> TimeSeriesTable {
    let dates = month_ends(today);
    let n = dates.len();
    debug!("Generating {} monthly rows up to {}", n, today);

    let gdp = GDP.draw(n, &mut *rng);
    let inflation = INFLATION.draw(n, &mut *rng);
    let interest_rate = INTEREST_RATE.draw(n, &mut *rng);
    let unemployment = UNEMPLOYMENT.draw(n, &mut *rng);
    let fx_rate = FX_RATE.draw(n, &mut *rng);

    let rows = dates
        .into_iter()
        .enumerate()
        .map(|(i, date)| MacroRecord {
            date,
            gdp: gdp[i],
            inflation: inflation[i],
            interest_rate: interest_rate[i],
            unemployment: unemployment[i],
            fx_rate: fx_rate[i],
        })
        .collect();

    TimeSeriesTable::new(rows)
}

/// Generate with an explicit seed, or from OS entropy when `seed` is `None`.
pub fn generate_with_seed(today: NaiveDate, seed: Option<u64>) -> TimeSeriesTable {
    let mut rng = match seed {
        Some(seed) => {
            info!("Generating baseline series with seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => {
            info!("Generating baseline series from entropy");
            StdRng::from_entropy()
        }
    };
    generate_series(today, &mut rng)
}
