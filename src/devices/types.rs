//! Common types and traits for synthetic energy sources.

use chrono::{Datelike, NaiveDateTime, Timelike};
use rand::{Rng, rngs::StdRng};

/// Contextual information passed to sources when sampling one step.
///
/// # Fields
/// * `timestep` - Current step index
/// * `timestamp` - Local wall-clock time at the start of the step
/// * `dt_hours` - Step length in hours
pub struct DeviceContext {
    pub timestep: usize,
    pub timestamp: NaiveDateTime,
    pub dt_hours: f64,
}

impl DeviceContext {
    pub fn new(timestep: usize, timestamp: NaiveDateTime, dt_hours: f64) -> Self {
        Self {
            timestep,
            timestamp,
            dt_hours,
        }
    }

    /// Fractional hour of day at the start of the step, in `[0, 24)`.
    pub fn hour_of_day(&self) -> f64 {
        f64::from(self.timestamp.hour())
            + f64::from(self.timestamp.minute()) / 60.0
            + f64::from(self.timestamp.second()) / 3600.0
    }

    /// Zero-based day of year.
    pub fn day_of_year(&self) -> u32 {
        self.timestamp.ordinal0()
    }
}

/// A source or sink of energy sampled once per step.
///
/// Sources are stateful (noise processes advance on every call), so steps
/// must be sampled in order.
pub trait Device {
    /// Returns the energy produced or consumed during the step (kWh, >= 0).
    ///
    /// # Arguments
    ///
    /// * `context` - Step index, timestamp and duration
    fn energy_kwh(&mut self, context: &DeviceContext) -> f64;

    /// Returns a human-readable type name for the device.
    fn device_type(&self) -> &'static str;
}

/// Zero-mean normal sample (Box-Muller); zero when `std_dev <= 0`.
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-9, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}

/// Half-sine daylight shape: 0 outside `[sunrise_h, sunset_h)`, 1 at solar noon.
pub fn daylight_frac(hour: f64, sunrise_h: f64, sunset_h: f64) -> f64 {
    if hour < sunrise_h || hour >= sunset_h || sunset_h <= sunrise_h {
        return 0.0;
    }
    let x = (hour - sunrise_h) / (sunset_h - sunrise_h);
    (std::f64::consts::PI * x).sin().max(0.0)
}
