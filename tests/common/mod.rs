//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use bess_sim::config::{Baseline, PolicyKind, ScenarioConfig};
use bess_sim::market::PriceSeries;
use bess_sim::series::EnergySeries;
use bess_sim::sim::types::StepRecord;

/// Midnight, January 1st 2024.
pub fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid start timestamp")
}

/// Hourly series with the same generation and demand on every step.
pub fn constant_series(hours: usize, renew_kwh: f64, demand_kwh: f64) -> EnergySeries {
    EnergySeries::constant(start(), TimeDelta::hours(1), hours, renew_kwh, demand_kwh)
        .expect("valid constant series")
}

/// Hourly series built from per-step generation and demand.
pub fn hourly_series(renew_kwh: Vec<f64>, demand_kwh: Vec<f64>) -> EnergySeries {
    EnergySeries::new(start(), TimeDelta::hours(1), renew_kwh, demand_kwh)
        .expect("valid hourly series")
}

/// Hourly prices (€/kWh) starting at [`start`].
pub fn hourly_prices(values: Vec<f64>) -> PriceSeries {
    PriceSeries::new(start(), values).expect("valid price series")
}

/// Repeats one day of hourly prices `days` times.
pub fn daily_prices(day: &[f64; 24], days: usize) -> PriceSeries {
    hourly_prices(day.iter().copied().cycle().take(24 * days).collect())
}

/// Default scenario running `kind` over `capacities_mwh` on one thread.
pub fn config_with(kind: PolicyKind, capacities_mwh: &[f64]) -> ScenarioConfig {
    let mut config = ScenarioConfig::default();
    config.simulation.parallel = false;
    config.policy.kind = kind;
    config.sweep.capacities_mwh = capacities_mwh.to_vec();
    config.sweep.baselines = vec![Baseline::AlwaysExport, Baseline::NoBattery];
    config
}

/// Makes the battery of `config` ideal: no losses, no leakage.
pub fn lossless(mut config: ScenarioConfig) -> ScenarioConfig {
    config.battery.efficiency_charge = 1.0;
    config.battery.efficiency_discharge = 1.0;
    config.battery.internal_resistance_ohm = 0.0;
    config.battery.self_discharge_rate = 0.0;
    config
}

/// Number of switches between charging and discharging in a run.
pub fn charge_discharge_transitions(records: &[StepRecord]) -> usize {
    let active: Vec<&str> = records
        .iter()
        .map(|r| r.decision.label())
        .filter(|label| matches!(*label, "charge" | "discharge"))
        .collect();
    active.windows(2).filter(|w| w[0] != w[1]).count()
}
