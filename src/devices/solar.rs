//! Solar park model with temporally correlated cloud variability (AR(1) process).

use rand::{SeedableRng, rngs::StdRng};

use crate::devices::types::{Device, DeviceContext, daylight_frac, gaussian_noise};

/// Minimum cloud multiplier (heavy overcast).
const MULTIPLIER_MIN: f64 = 0.2;
/// Maximum cloud multiplier (enhanced irradiance from cloud edges).
const MULTIPLIER_MAX: f64 = 1.2;
/// Day length swing around 12 h between solstices.
const DAY_LENGTH_SWING_H: f64 = 4.0;
/// Day of year of the summer solstice (zero-based).
const SOLSTICE_DAY: f64 = 171.0;

/// Solar park with a seasonal half-sine profile and an AR(1) cloud multiplier.
///
/// The multiplier reverts towards clear sky:
/// ```text
/// m(t) = alpha * m(t-1) + (1 - alpha) * (1 + epsilon(t))
/// ```
/// and is clamped to \[0.2, 1.2\]. Day length follows the season, from
/// 8 h at the winter solstice to 16 h in midsummer, centered on 12:00.
#[derive(Debug, Clone)]
pub struct SolarPark {
    /// Installed peak power in kilowatts.
    pub kw_peak: f64,

    /// AR(1) correlation coefficient (0.0 = uncorrelated, 1.0 = fully persistent).
    pub alpha: f64,

    /// Standard deviation of the AR(1) innovation noise.
    pub cloud_noise_std: f64,

    /// Current cloud multiplier state.
    multiplier: f64,

    rng: StdRng,
}

impl SolarPark {
    /// Creates a new solar park.
    ///
    /// # Arguments
    ///
    /// * `kw_peak` - Installed peak power in kilowatts
    /// * `alpha` - AR(1) correlation coefficient (typical: 0.8–0.95)
    /// * `cloud_noise_std` - Standard deviation of innovation noise (typical: 0.15–0.3)
    /// * `seed` - Random seed for reproducible noise generation
    pub fn new(kw_peak: f64, alpha: f64, cloud_noise_std: f64, seed: u64) -> Self {
        Self {
            kw_peak: kw_peak.max(0.0),
            alpha: alpha.clamp(0.0, 1.0),
            cloud_noise_std: cloud_noise_std.max(0.0),
            multiplier: 1.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Sunrise and sunset hours for a zero-based day of year.
    pub fn daylight_window(day_of_year: u32) -> (f64, f64) {
        let angle = 2.0 * std::f64::consts::PI * (f64::from(day_of_year) - SOLSTICE_DAY) / 365.0;
        let length = 12.0 + DAY_LENGTH_SWING_H * angle.cos();
        (12.0 - length / 2.0, 12.0 + length / 2.0)
    }

    fn advance_multiplier(&mut self) -> f64 {
        let epsilon = gaussian_noise(&mut self.rng, self.cloud_noise_std);
        self.multiplier = self.alpha * self.multiplier + (1.0 - self.alpha) * (1.0 + epsilon);
        self.multiplier = self.multiplier.clamp(MULTIPLIER_MIN, MULTIPLIER_MAX);
        self.multiplier
    }
}

impl Device for SolarPark {
    /// Generation during the step, evaluated at the step midpoint.
    ///
    /// The cloud multiplier evolves every step regardless of daylight.
    fn energy_kwh(&mut self, context: &DeviceContext) -> f64 {
        let m = self.advance_multiplier();
        let (sunrise, sunset) = Self::daylight_window(context.day_of_year());
        let mid = context.hour_of_day() + context.dt_hours / 2.0;
        let frac = daylight_frac(mid, sunrise, sunset);
        (self.kw_peak * frac * m * context.dt_hours).max(0.0)
    }

    fn device_type(&self) -> &'static str {
        "SolarPark"
    }
}
