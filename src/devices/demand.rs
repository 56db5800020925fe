use rand::{SeedableRng, rngs::StdRng};

use crate::devices::types::{Device, DeviceContext, gaussian_noise};

/// Hours in a non-leap year, used to turn an annual total into a mean load.
const HOURS_PER_YEAR: f64 = 8760.0;
/// Hour of the daily consumption peak.
const EVENING_PEAK_H: f64 = 19.0;

/// Residential community demand that models daily and seasonal patterns.
///
/// The load is a sinusoidal daily profile peaking in the evening, lifted in
/// winter and lowered in summer, with multiplicative Gaussian noise. Its
/// mean equals `annual_kwh / 8760` so a full year sums to roughly the
/// configured annual total.
///
/// # Examples
///
/// ```
/// use bess_sim::devices::demand::CommunityDemand;
///
/// let load = CommunityDemand::new(
///     8760.0, // annual_kwh - 1 kW on average
///     0.35,   // daily_amp - relative daily swing
///     0.15,   // seasonal_amp - relative winter/summer swing
///     0.05,   // noise_std - relative random variation
///     42,     // seed - for reproducible randomness
/// );
/// assert_eq!(load.mean_kw(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct CommunityDemand {
    /// Mean power consumption in kilowatts
    mean_kw: f64,

    /// Relative amplitude of the daily sinusoid
    pub daily_amp: f64,

    /// Relative amplitude of the seasonal cosine (maximum at new year)
    pub seasonal_amp: f64,

    /// Relative standard deviation of the Gaussian noise
    pub noise_std: f64,

    rng: StdRng,
}

impl CommunityDemand {
    /// Creates a new community demand generator.
    ///
    /// # Arguments
    ///
    /// * `annual_kwh` - Total consumption over a year
    /// * `daily_amp` - Relative daily variation (0.0-1.0)
    /// * `seasonal_amp` - Relative seasonal variation (0.0-1.0)
    /// * `noise_std` - Relative standard deviation of noise
    /// * `seed` - Random seed for reproducible noise generation
    pub fn new(
        annual_kwh: f64,
        daily_amp: f64,
        seasonal_amp: f64,
        noise_std: f64,
        seed: u64,
    ) -> Self {
        Self {
            mean_kw: annual_kwh.max(0.0) / HOURS_PER_YEAR,
            daily_amp,
            seasonal_amp,
            noise_std,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn mean_kw(&self) -> f64 {
        self.mean_kw
    }
}

impl Device for CommunityDemand {
    /// Consumption during the step; never negative.
    fn energy_kwh(&mut self, context: &DeviceContext) -> f64 {
        let tau = 2.0 * std::f64::consts::PI;
        let hour = context.hour_of_day() + context.dt_hours / 2.0;
        let daily = (tau * (hour - EVENING_PEAK_H) / 24.0).cos();
        let seasonal = (tau * f64::from(context.day_of_year()) / 365.0).cos();
        let noise = gaussian_noise(&mut self.rng, self.noise_std);

        let kw = self.mean_kw
            * (1.0 + self.daily_amp * daily + self.seasonal_amp * seasonal)
            * (1.0 + noise);
        (kw * context.dt_hours).max(0.0)
    }

    fn device_type(&self) -> &'static str {
        "CommunityDemand"
    }
}
