//! Wind farm with an AR(1) capacity factor.

use rand::{SeedableRng, rngs::StdRng};

use crate::devices::types::{Device, DeviceContext, gaussian_noise};

/// Long-run mean capacity factor of an onshore site.
const MEAN_CAPACITY_FACTOR: f64 = 0.3;

/// Wind farm whose capacity factor follows a mean-reverting AR(1) process.
///
/// ```text
/// cf(t) = alpha * cf(t-1) + (1 - alpha) * (0.3 + epsilon(t))
/// ```
/// clamped to \[0, 1\].
#[derive(Debug, Clone)]
pub struct WindFarm {
    /// Installed power in kilowatts.
    pub kw_rated: f64,
    pub alpha: f64,
    pub noise_std: f64,
    capacity_factor: f64,
    rng: StdRng,
}

impl WindFarm {
    pub fn new(kw_rated: f64, alpha: f64, noise_std: f64, seed: u64) -> Self {
        Self {
            kw_rated: kw_rated.max(0.0),
            alpha: alpha.clamp(0.0, 1.0),
            noise_std: noise_std.max(0.0),
            capacity_factor: MEAN_CAPACITY_FACTOR,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Device for WindFarm {
    fn energy_kwh(&mut self, context: &DeviceContext) -> f64 {
        let epsilon = gaussian_noise(&mut self.rng, self.noise_std);
        self.capacity_factor = (self.alpha * self.capacity_factor
            + (1.0 - self.alpha) * (MEAN_CAPACITY_FACTOR + epsilon))
            .clamp(0.0, 1.0);
        self.kw_rated * self.capacity_factor * context.dt_hours
    }

    fn device_type(&self) -> &'static str {
        "WindFarm"
    }
}
