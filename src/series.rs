//! Generation/demand time series consumed by the simulation engine.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, TimeDelta};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::sim::clock::Clock;

/// Timestamp layouts accepted in CSV inputs.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parses a local timestamp, accepting a trailing UTC offset.
///
/// An offset is dropped and the local wall-clock time kept.
pub(crate) fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z")
                .or_else(|_| DateTime::parse_from_rfc3339(raw))
                .ok()
                .map(|dt| dt.naive_local())
        })
}

/// A gap-free, evenly spaced series of renewable generation and demand.
///
/// Both columns are energies per step in kWh. Demand is non-negative for
/// consumers; pure producers carry an all-zero demand column.
#[derive(Debug, Clone)]
pub struct EnergySeries {
    start: NaiveDateTime,
    step: TimeDelta,
    renew_kwh: Vec<f64>,
    demand_kwh: Vec<f64>,
}

impl EnergySeries {
    /// Creates a series from aligned columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSeries`] if the series is empty, the columns
    /// differ in length or the step is not positive.
    pub fn new(
        start: NaiveDateTime,
        step: TimeDelta,
        renew_kwh: Vec<f64>,
        demand_kwh: Vec<f64>,
    ) -> Result<Self> {
        if renew_kwh.is_empty() {
            return Err(Error::InvalidSeries("series is empty".into()));
        }
        if renew_kwh.len() != demand_kwh.len() {
            return Err(Error::InvalidSeries(format!(
                "renewable column has {} rows, demand column has {}",
                renew_kwh.len(),
                demand_kwh.len()
            )));
        }
        if step <= TimeDelta::zero() {
            return Err(Error::InvalidSeries("step must be positive".into()));
        }
        Ok(Self {
            start,
            step,
            renew_kwh,
            demand_kwh,
        })
    }

    /// A series with the same generation and demand on every step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSeries`] if `len` is zero or `step` is not positive.
    pub fn constant(
        start: NaiveDateTime,
        step: TimeDelta,
        len: usize,
        renew_kwh: f64,
        demand_kwh: f64,
    ) -> Result<Self> {
        Self::new(start, step, vec![renew_kwh; len], vec![demand_kwh; len])
    }

    pub fn len(&self) -> usize {
        self.renew_kwh.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renew_kwh.is_empty()
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn step(&self) -> TimeDelta {
        self.step
    }

    /// Step length in hours.
    pub fn resolution_h(&self) -> f64 {
        self.step.num_seconds() as f64 / 3600.0
    }

    /// Timestamp of step `index`.
    pub fn timestamp(&self, index: usize) -> NaiveDateTime {
        self.clock().timestamp(index)
    }

    /// A clock over every step of the series.
    pub fn clock(&self) -> Clock {
        Clock::new(self.start, self.step, self.len())
    }

    pub fn renew_kwh(&self) -> &[f64] {
        &self.renew_kwh
    }

    pub fn demand_kwh(&self) -> &[f64] {
        &self.demand_kwh
    }

    /// Total renewable generation (kWh).
    pub fn total_renew_kwh(&self) -> f64 {
        self.renew_kwh.iter().sum()
    }

    /// Total demand (kWh), counting magnitudes.
    pub fn total_demand_kwh(&self) -> f64 {
        self.demand_kwh.iter().map(|d| d.abs()).sum()
    }

    /// Loads a series from a CSV file.
    ///
    /// # Errors
    ///
    /// See [`EnergySeries::from_reader`].
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    /// Reads a `timestamp,renew_kwh,demand_kwh` CSV.
    ///
    /// The resolution is taken from the first two rows. Rows are placed on
    /// an even grid between the first and the last timestamp, which repairs
    /// gaps left by the exporting tool. Empty numeric cells count as zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSeries`] for missing columns or fewer than two
    /// rows, and [`Error::Parse`] for malformed cells.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers = rdr.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| Error::InvalidSeries(format!("missing column \"{name}\"")))
        };
        let ts_col = column("timestamp")?;
        let renew_col = column("renew_kwh")?;
        let demand_col = column("demand_kwh")?;

        let mut timestamps = Vec::new();
        let mut renew_kwh = Vec::new();
        let mut demand_kwh = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line() as usize);
            let raw_ts = record.get(ts_col).unwrap_or_default();
            let ts = parse_timestamp(raw_ts).ok_or_else(|| Error::Parse {
                line,
                detail: format!("invalid timestamp \"{raw_ts}\""),
            })?;
            timestamps.push(ts);
            renew_kwh.push(parse_energy(record.get(renew_col), line)?);
            demand_kwh.push(parse_energy(record.get(demand_col), line)?);
        }

        if timestamps.len() < 2 {
            return Err(Error::InvalidSeries(
                "at least two rows are required to infer the resolution".into(),
            ));
        }

        let first = timestamps[0];
        let last = timestamps[timestamps.len() - 1];
        let step = timestamps[1] - first;
        if step <= TimeDelta::zero() {
            return Err(Error::InvalidSeries(
                "timestamps must be strictly increasing".into(),
            ));
        }

        let intervals = i32::try_from(timestamps.len() - 1)
            .map_err(|_| Error::InvalidSeries("series is too long".into()))?;
        let even_step = (last - first) / intervals;
        if even_step != step {
            warn!(
                resolution = %step,
                spacing = %even_step,
                "series is not evenly spaced, re-spacing timestamps linearly"
            );
        }
        debug!(rows = timestamps.len(), %first, %last, "loaded energy series");

        Self::new(first, even_step, renew_kwh, demand_kwh)
    }
}

fn parse_energy(cell: Option<&str>, line: usize) -> Result<f64> {
    match cell.map(str::trim) {
        None | Some("") => Ok(0.0),
        Some(raw) => raw.parse::<f64>().map_err(|_| Error::Parse {
            line,
            detail: format!("invalid energy value \"{raw}\""),
        }),
    }
}
