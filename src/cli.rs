use std::path::PathBuf;

use clap::Parser;

/// Preset used when neither `--scenario` nor `--preset` is given.
pub const DEFAULT_PRESET: &str = "biogas";

#[derive(Debug, Parser)]
#[command(name = "bess-sim")]
#[command(author, version, about = "Battery storage value estimation")]
#[command(
    long_about = "Sweeps battery capacities over a year of generation, demand and spot prices\n\
    and compares the result against reference rows without storage.\n\
    \nExamples:\n  \
    bess-sim --preset solar\n  \
    bess-sim --scenario scenarios/community.toml --prices prices_2024.csv\n  \
    bess-sim --preset biogas --days 30 --table-out table.csv"
)]
pub struct Args {
    /// Scenario TOML file
    #[arg(long, conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Built-in preset (biogas, solar, solar_day_ahead, community)
    #[arg(long)]
    pub preset: Option<String>,

    /// Hourly spot price CSV with `time` and `price` (ct/kWh) columns
    #[arg(long)]
    pub prices: Option<PathBuf>,

    /// Generation/demand CSV (`timestamp,renew_kwh,demand_kwh`) replacing the synthetic profile
    #[arg(long)]
    pub series: Option<PathBuf>,

    /// Override the random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the number of simulated days
    #[arg(long)]
    pub days: Option<usize>,

    /// Write the comparison table as CSV
    #[arg(long)]
    pub table_out: Option<PathBuf>,

    /// Write the step records of one capacity as CSV
    #[arg(long)]
    pub telemetry_out: Option<PathBuf>,

    /// Capacity whose steps are written by `--telemetry-out` (MWh)
    #[arg(long, default_value_t = 1.0)]
    pub telemetry_capacity_mwh: f64,

    /// Run the capacity sweep on a single thread
    #[arg(long)]
    pub sequential: bool,
}

impl Args {
    /// Preset to load when no scenario file is given.
    pub fn preset_name(&self) -> &str {
        self.preset.as_deref().unwrap_or(DEFAULT_PRESET)
    }
}
