//! Hourly spot price series: loading, gap filling and reference prices.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike, Weekday};
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, warn};

use crate::devices::profile::year_start;
use crate::devices::types::gaussian_noise;
use crate::error::{Error, Result};
use crate::series::parse_timestamp;

/// Width of the centered rolling mean used as reference price (hours).
pub const ROLLING_WINDOW: usize = 25;

/// Number of hourly rows a price file must hold to cover `year`.
///
/// One hour is tolerated for the spring daylight-saving switch.
pub fn required_hours(year: i32) -> usize {
    let leap = NaiveDate::from_ymd_opt(year, 2, 29).is_some();
    let days = if leap { 366 } else { 365 };
    days * 24 - 1
}

/// Centered rolling mean with partial windows at the edges.
///
/// Each output sample averages the inputs within `window / 2` positions on
/// either side, using as many as exist near the ends of the series.
pub fn rolling_mean_centered(values: &[f64], window: usize) -> Vec<f64> {
    let half = window / 2;
    let mut prefix = Vec::with_capacity(values.len() + 1);
    prefix.push(0.0);
    for v in values {
        let last = prefix.last().copied().unwrap_or(0.0);
        prefix.push(last + v);
    }
    (0..values.len())
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half + 1).min(values.len());
            (prefix[hi] - prefix[lo]) / (hi - lo) as f64
        })
        .collect()
}

/// Hourly spot prices in €/kWh, gap-free.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    start: NaiveDateTime,
    eur_per_kwh: Vec<f64>,
    filled: usize,
}

impl PriceSeries {
    /// Wraps already clean hourly prices (€/kWh).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSeries`] if `eur_per_kwh` is empty.
    pub fn new(start: NaiveDateTime, eur_per_kwh: Vec<f64>) -> Result<Self> {
        if eur_per_kwh.is_empty() {
            return Err(Error::InvalidSeries("price series is empty".into()));
        }
        Ok(Self {
            start,
            eur_per_kwh,
            filled: 0,
        })
    }

    /// Loads a price file for `year`.
    ///
    /// # Errors
    ///
    /// See [`PriceSeries::from_reader`].
    pub fn from_path(path: &Path, year: i32) -> Result<Self> {
        Self::from_reader(File::open(path)?, year)
    }

    /// Reads an hourly price CSV with `time` and `price` (ct/kWh) columns.
    ///
    /// Other columns are ignored. Empty or `NaN` price cells are missing
    /// samples and are replaced by the mean of the present ones.
    ///
    /// # Errors
    ///
    /// * [`Error::DataMismatch`] if the first timestamp is not in `year`
    /// * [`Error::IncompleteYear`] if fewer than [`required_hours`] rows exist
    /// * [`Error::Parse`] for malformed timestamps or prices
    /// * [`Error::InvalidSeries`] for missing columns or a file without any price
    pub fn from_reader<R: Read>(reader: R, year: i32) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers = rdr.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| Error::InvalidSeries(format!("price file lacks column \"{name}\"")))
        };
        let time_col = column("time")?;
        let price_col = column("price")?;

        let mut start = None;
        let mut samples: Vec<Option<f64>> = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line() as usize);
            if start.is_none() {
                let raw = record.get(time_col).unwrap_or_default();
                start = Some(parse_timestamp(raw).ok_or_else(|| Error::Parse {
                    line,
                    detail: format!("invalid time \"{raw}\""),
                })?);
            }
            let sample = match record.get(price_col).map(str::trim) {
                None | Some("") => None,
                Some(raw) => {
                    let ct: f64 = raw.parse().map_err(|_| Error::Parse {
                        line,
                        detail: format!("invalid price \"{raw}\""),
                    })?;
                    (!ct.is_nan()).then_some(ct / 100.0)
                }
            };
            samples.push(sample);
        }

        let required = required_hours(year);
        let Some(start) = start else {
            return Err(Error::IncompleteYear {
                year,
                rows: 0,
                required,
            });
        };
        if start.year() != year {
            return Err(Error::DataMismatch {
                expected: year,
                found: start.year(),
            });
        }
        if samples.len() < required {
            return Err(Error::IncompleteYear {
                year,
                rows: samples.len(),
                required,
            });
        }

        let present: Vec<f64> = samples.iter().flatten().copied().collect();
        if present.is_empty() {
            return Err(Error::InvalidSeries("price file holds no prices".into()));
        }
        let mean = present.iter().sum::<f64>() / present.len() as f64;
        let filled = samples.len() - present.len();
        if filled > 0 {
            warn!(
                missing = filled,
                mean_eur_per_kwh = mean,
                "filling missing price samples with the series mean"
            );
        }
        debug!(rows = samples.len(), %start, "loaded price series");

        Ok(Self {
            start,
            eur_per_kwh: samples.into_iter().map(|s| s.unwrap_or(mean)).collect(),
            filled,
        })
    }

    /// A reproducible spot price year with daily and seasonal shape.
    ///
    /// Morning and evening peaks, a midday solar dip that deepens in
    /// summer, cheaper weekends and a slowly wandering daily level.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for years chrono cannot represent.
    pub fn synthetic(year: i32, seed: u64) -> Result<Self> {
        let start = year_start(year)?;
        let hours = required_hours(year) + 1;
        let mut rng = StdRng::seed_from_u64(seed);
        let bump = |h: f64, center: f64, width: f64| (-((h - center) / width).powi(2)).exp();

        let mut level = 0.0;
        let mut prices = Vec::with_capacity(hours);
        for i in 0..hours {
            let at = start + TimeDelta::hours(i as i64);
            let h = f64::from(at.hour());
            if h == 0.0 {
                level = 0.7 * level + gaussian_noise(&mut rng, 1.5);
            }
            let season = (2.0 * std::f64::consts::PI * (f64::from(at.ordinal0()) - 171.0) / 365.0)
                .cos()
                .mul_add(0.5, 0.5);
            let weekend = matches!(at.weekday(), Weekday::Sat | Weekday::Sun);

            let ct = 9.0 + level + 2.5 * bump(h, 8.0, 2.0) + 4.0 * bump(h, 19.0, 2.5)
                - 7.0 * season * bump(h, 13.0, 2.5)
                - if weekend { 1.5 } else { 0.0 }
                + gaussian_noise(&mut rng, 0.8);
            prices.push(ct / 100.0);
        }
        Self::new(start, prices)
    }

    /// Timestamp of the first sample.
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    pub fn len(&self) -> usize {
        self.eur_per_kwh.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eur_per_kwh.is_empty()
    }

    /// Hourly prices (€/kWh).
    pub fn prices(&self) -> &[f64] {
        &self.eur_per_kwh
    }

    /// Number of samples replaced by the mean while loading.
    pub fn filled_count(&self) -> usize {
        self.filled
    }

    /// Centered [`ROLLING_WINDOW`]-hour reference price.
    pub fn rolling_mean(&self) -> Vec<f64> {
        rolling_mean_centered(&self.eur_per_kwh, ROLLING_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    /// Builds a price CSV with one row per hour from Jan 1 of `year`.
    fn price_csv(year: i32, rows: usize, cell: impl Fn(usize) -> String) -> String {
        let start = year_start(year).unwrap();
        let mut out = String::from("time,price,unit\n");
        for i in 0..rows {
            let at = start + TimeDelta::hours(i as i64);
            out.push_str(&format!("{},{},ct/kWh\n", at.format("%Y-%m-%d %H:%M:%S"), cell(i)));
        }
        out
    }

    #[test]
    fn required_hours_accounts_for_leap_years() {
        assert_eq!(required_hours(2023), 8759);
        assert_eq!(required_hours(2024), 8783);
    }

    #[test]
    fn rolling_mean_uses_partial_windows_at_edges() {
        let values: Vec<f64> = (0..30).map(f64::from).collect();
        let mean = rolling_mean_centered(&values, 25);
        // First sample averages 0..=12.
        assert_abs_diff_eq!(mean[0], 6.0, epsilon = 1e-12);
        // Sample 12 sees the full window 0..=24.
        assert_abs_diff_eq!(mean[12], 12.0, epsilon = 1e-12);
        // Last sample averages 17..=29.
        assert_abs_diff_eq!(mean[29], 23.0, epsilon = 1e-12);
    }

    #[test]
    fn rolling_mean_of_short_series() {
        let mean = rolling_mean_centered(&[2.0, 4.0], 25);
        assert_eq!(mean, vec![3.0, 3.0]);
    }

    #[test]
    fn converts_cents_to_euros() {
        let csv = price_csv(2023, 8760, |_| "12.5".into());
        let prices = PriceSeries::from_reader(csv.as_bytes(), 2023).unwrap();
        assert_eq!(prices.len(), 8760);
        assert_abs_diff_eq!(prices.prices()[0], 0.125, epsilon = 1e-12);
        assert_eq!(prices.filled_count(), 0);
    }

    #[test]
    fn missing_prices_are_filled_with_mean() {
        // Alternating 10 and 20 ct with every tenth cell empty.
        let csv = price_csv(2023, 8760, |i| match i {
            i if i % 10 == 9 => String::new(),
            i if i % 2 == 0 => "10".into(),
            _ => "20".into(),
        });
        let prices = PriceSeries::from_reader(csv.as_bytes(), 2023).unwrap();
        assert_eq!(prices.filled_count(), 876);
        // Each block of ten holds five 10 ct and four 20 ct samples.
        assert_abs_diff_eq!(prices.prices()[9], 1.3 / 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(prices.prices()[8], 0.10, epsilon = 1e-12);
    }

    #[test]
    fn year_mismatch_is_fatal() {
        let csv = price_csv(2023, 8760, |_| "10".into());
        let err = PriceSeries::from_reader(csv.as_bytes(), 2024).unwrap_err();
        assert!(
            matches!(err, Error::DataMismatch { expected: 2024, found: 2023 }),
            "got {err:?}"
        );
    }

    #[test]
    fn partial_year_is_rejected() {
        let csv = price_csv(2023, 24 * 30, |_| "10".into());
        let err = PriceSeries::from_reader(csv.as_bytes(), 2023).unwrap_err();
        assert!(matches!(err, Error::IncompleteYear { rows: 720, .. }), "got {err:?}");
    }

    #[test]
    fn dst_short_year_is_accepted() {
        let csv = price_csv(2023, 8759, |_| "10".into());
        assert!(PriceSeries::from_reader(csv.as_bytes(), 2023).is_ok());
    }

    #[test]
    fn malformed_price_reports_line() {
        let csv = "time,price\n2023-01-01 00:00:00,ten\n";
        let err = PriceSeries::from_reader(csv.as_bytes(), 2023).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }), "got {err:?}");
    }

    #[test]
    fn synthetic_year_is_full_and_reproducible() {
        let a = PriceSeries::synthetic(2024, 5).unwrap();
        let b = PriceSeries::synthetic(2024, 5).unwrap();
        assert_eq!(a.len(), 8784);
        assert_eq!(a.prices(), b.prices());
        assert_eq!(a.year(), 2024);
    }
}
