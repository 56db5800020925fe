//! Synthetic generation/demand series built from the configured sources.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use tracing::debug;

use crate::config::{ConfigError, ProfileConfig, SimulationConfig};
use crate::devices::{BiogasChp, CommunityDemand, Device, DeviceContext, SolarPark, WindFarm};
use crate::error::Result;
use crate::series::EnergySeries;

/// Seed offset for the wind RNG to avoid correlation with the solar clouds.
const WIND_SEED_OFFSET: u64 = 31;
/// Seed offset for the demand RNG.
const DEMAND_SEED_OFFSET: u64 = 57;

const DEMAND_DAILY_AMP: f64 = 0.35;
const DEMAND_SEASONAL_AMP: f64 = 0.15;

/// Midnight on the first of January of `year`.
///
/// # Errors
///
/// Returns a configuration error for years chrono cannot represent.
pub fn year_start(year: i32) -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ConfigError::new("simulation.year", "out of range").into())
}

/// Generates a reproducible series for the configured installation.
///
/// Every source with a non-zero rating contributes: biogas output, solar
/// and wind generation are summed into the renewable column, community
/// demand fills the demand column.
///
/// # Errors
///
/// Returns [`crate::Error::Configuration`] for an invalid calendar and
/// [`crate::Error::InvalidSeries`] if the grid would be empty.
pub fn synthetic_series(sim: &SimulationConfig, profile: &ProfileConfig) -> Result<EnergySeries> {
    if sim.resolution_minutes == 0 || 60 % sim.resolution_minutes != 0 {
        return Err(ConfigError::new("simulation.resolution_minutes", "must be a divisor of 60").into());
    }
    let start = year_start(sim.year)?;
    let step = TimeDelta::minutes(i64::from(sim.resolution_minutes));
    let steps_per_day = (24 * 60 / sim.resolution_minutes) as usize;
    let total = steps_per_day * sim.days;
    let dt_hours = f64::from(sim.resolution_minutes) / 60.0;

    let mut sources: Vec<Box<dyn Device>> = Vec::new();
    if profile.constant_biogas_kw > 0.0 {
        sources.push(Box::new(BiogasChp::new(profile.constant_biogas_kw)));
    }
    if profile.solar_peak_kw > 0.0 {
        sources.push(Box::new(SolarPark::new(
            profile.solar_peak_kw,
            profile.alpha,
            profile.noise_std,
            sim.seed,
        )));
    }
    if profile.wind_peak_kw > 0.0 {
        sources.push(Box::new(WindFarm::new(
            profile.wind_peak_kw,
            profile.alpha,
            profile.noise_std,
            sim.seed.wrapping_add(WIND_SEED_OFFSET),
        )));
    }
    let mut demand = (profile.annual_demand_kwh > 0.0).then(|| {
        CommunityDemand::new(
            profile.annual_demand_kwh,
            DEMAND_DAILY_AMP,
            DEMAND_SEASONAL_AMP,
            profile.noise_std / 4.0,
            sim.seed.wrapping_add(DEMAND_SEED_OFFSET),
        )
    });

    let mut renew_kwh = Vec::with_capacity(total);
    let mut demand_kwh = Vec::with_capacity(total);
    let mut at = start;
    for t in 0..total {
        let context = DeviceContext::new(t, at, dt_hours);
        renew_kwh.push(sources.iter_mut().map(|s| s.energy_kwh(&context)).sum());
        demand_kwh.push(demand.as_mut().map_or(0.0, |d| d.energy_kwh(&context)));
        at += step;
    }

    debug!(
        application = ?profile.application,
        steps = total,
        sources = ?sources.iter().map(|s| s.device_type()).collect::<Vec<_>>(),
        "generated synthetic series"
    );
    EnergySeries::new(start, step, renew_kwh, demand_kwh)
}
