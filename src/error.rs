//! Crate-wide error type.

use crate::config::ConfigError;

/// Errors raised while configuring or preparing a simulation.
///
/// Nothing on the per-step path returns an error: infeasible requests are
/// clamped by the battery and decisions are plain predicates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid battery or scenario parameters.
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// The price file belongs to another year than the simulation.
    #[error("price data is for {found}, but the simulation is configured for {expected}")]
    DataMismatch { expected: i32, found: i32 },

    /// The price file does not cover the whole configured year.
    #[error("price data for {year} covers {rows} hours, expected at least {required}")]
    IncompleteYear {
        year: i32,
        rows: usize,
        required: usize,
    },

    /// The driver series is empty or its columns disagree.
    #[error("invalid time series: {0}")]
    InvalidSeries(String),

    /// A CSV cell or timestamp could not be parsed.
    #[error("line {line}: {detail}")]
    Parse { line: usize, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
