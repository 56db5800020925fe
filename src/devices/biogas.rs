use crate::devices::types::{Device, DeviceContext};

/// Biogas combined heat and power plant running at constant output.
#[derive(Debug, Clone, Copy)]
pub struct BiogasChp {
    /// Electrical output in kilowatts.
    pub kw: f64,
}

impl BiogasChp {
    pub fn new(kw: f64) -> Self {
        Self { kw: kw.max(0.0) }
    }
}

impl Device for BiogasChp {
    fn energy_kwh(&mut self, context: &DeviceContext) -> f64 {
        self.kw * context.dt_hours
    }

    fn device_type(&self) -> &'static str {
        "BiogasChp"
    }
}
