use crate::config::{BatteryConfig, ConfigError};
use crate::error::Result;

/// Energy bookkeeping of one [`Battery::execute`] call.
///
/// All amounts are in kWh and never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Exchange {
    /// Energy taken from the source while charging.
    pub absorbed_kwh: f64,
    /// Energy that actually ended up in the store.
    pub stored_kwh: f64,
    /// Energy removed from the store while discharging.
    pub drawn_kwh: f64,
    /// Energy handed to the load or grid while discharging.
    pub delivered_kwh: f64,
    /// Conduction (I²R) loss.
    pub loss_kwh: f64,
    /// Energy lost to self-discharge during the step.
    pub self_discharge_kwh: f64,
}

/// A stationary battery with SOC window, I²R losses and self-discharge.
///
/// `Battery` owns its storage level exclusively for the duration of one
/// simulation run. It is the only component that enforces physical limits:
/// controllers propose amounts, the battery clamps them.
///
/// # Invariant
///
/// `min_soc * capacity_kwh <= storage_kwh <= max_soc * capacity_kwh` holds
/// after construction and after every call to [`Battery::execute`].
#[derive(Debug, Clone)]
pub struct Battery {
    /// Nominal capacity in kilowatt-hours.
    pub capacity_kwh: f64,

    /// Charge/discharge power ceiling in kilowatts.
    pub p_max_kw: f64,

    /// Lower SOC bound (fraction of capacity).
    pub min_soc: f64,

    /// Upper SOC bound (fraction of capacity).
    pub max_soc: f64,

    /// Charging efficiency (0..1.0].
    pub efficiency_charge: f64,

    /// Discharging efficiency (0..1.0].
    pub efficiency_discharge: f64,

    /// Self-discharge as a fraction of the stored energy per hour.
    pub self_discharge_rate: f64,

    /// Internal resistance in ohms.
    pub internal_resistance_ohm: f64,

    /// Nominal DC voltage in volts.
    pub nominal_voltage_v: f64,

    storage_kwh: f64,
}

impl Battery {
    /// Creates a battery at 50% SOC.
    ///
    /// # Arguments
    ///
    /// * `config` - Physical parameters shared by every capacity of a sweep
    /// * `capacity_kwh` - Nominal capacity in kWh (must be > 0)
    /// * `p_max_kw` - Power ceiling in kW (must be > 0)
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Configuration`] for non-positive capacity or
    /// power, an inverted or out-of-range SOC window, efficiencies outside
    /// (0, 1], negative loss parameters or a non-positive voltage.
    pub fn new(config: &BatteryConfig, capacity_kwh: f64, p_max_kw: f64) -> Result<Self> {
        if capacity_kwh.is_nan() || capacity_kwh <= 0.0 {
            return Err(invalid("battery.capacity_kwh", "must be > 0"));
        }
        if p_max_kw.is_nan() || p_max_kw <= 0.0 {
            return Err(invalid("battery.p_max_kw", "must be > 0"));
        }
        if let Some(error) = config.validate().into_iter().next() {
            return Err(error.into());
        }

        Ok(Self {
            capacity_kwh,
            p_max_kw,
            min_soc: config.min_soc,
            max_soc: config.max_soc,
            efficiency_charge: config.efficiency_charge,
            efficiency_discharge: config.efficiency_discharge,
            self_discharge_rate: config.self_discharge_rate,
            internal_resistance_ohm: config.internal_resistance_ohm,
            nominal_voltage_v: config.nominal_voltage_v,
            storage_kwh: 0.5 * capacity_kwh,
        })
    }

    /// Current stored energy (kWh).
    pub fn storage_kwh(&self) -> f64 {
        self.storage_kwh
    }

    /// Current state of charge as a fraction of capacity.
    pub fn soc(&self) -> f64 {
        self.storage_kwh / self.capacity_kwh
    }

    /// Lowest admissible storage level (kWh).
    pub fn floor_kwh(&self) -> f64 {
        self.min_soc * self.capacity_kwh
    }

    /// Highest admissible storage level (kWh).
    pub fn ceiling_kwh(&self) -> f64 {
        self.max_soc * self.capacity_kwh
    }

    /// Restores the battery to 50% SOC.
    pub fn reset(&mut self) {
        self.storage_kwh = 0.5 * self.capacity_kwh;
    }

    /// Conduction loss for moving `energy_kwh` within `dt_h` hours.
    fn conduction_loss_kwh(&self, energy_kwh: f64, dt_h: f64) -> f64 {
        if energy_kwh <= 0.0 || self.internal_resistance_ohm <= 0.0 {
            return 0.0;
        }
        let power_w = energy_kwh / dt_h * 1000.0;
        let current_a = power_w / self.nominal_voltage_v;
        current_a * current_a * self.internal_resistance_ohm * dt_h / 1000.0
    }

    /// Charges or discharges for one step, then applies self-discharge.
    ///
    /// At most one of `charge_kwh` and `discharge_kwh` may be positive; both
    /// zero is an idle step. Requests are clamped to the power ceiling and the
    /// SOC window.
    ///
    /// # Arguments
    ///
    /// * `charge_kwh` - Energy offered for charging
    /// * `discharge_kwh` - Energy requested from the store
    /// * `dt_h` - Step duration in hours
    pub fn execute(&mut self, charge_kwh: f64, discharge_kwh: f64, dt_h: f64) -> Exchange {
        debug_assert!(
            charge_kwh <= 0.0 || discharge_kwh <= 0.0,
            "charge and discharge requested in the same step"
        );
        let power_cap_kwh = self.p_max_kw * dt_h;
        let mut exchange = Exchange::default();

        if charge_kwh > 0.0 {
            let headroom = (self.ceiling_kwh() - self.storage_kwh).max(0.0);
            let actual = charge_kwh.min(power_cap_kwh).min(headroom);
            let loss = self.conduction_loss_kwh(actual, dt_h);
            let stored = (actual - loss).max(0.0) * self.efficiency_charge;
            self.storage_kwh += stored;

            exchange.absorbed_kwh = actual;
            exchange.stored_kwh = stored;
            exchange.loss_kwh = loss.min(actual);
        } else if discharge_kwh > 0.0 {
            let available = (self.storage_kwh - self.floor_kwh()).max(0.0);
            let actual = discharge_kwh.min(power_cap_kwh).min(available);
            let loss = self.conduction_loss_kwh(actual, dt_h);
            self.storage_kwh -= actual;

            exchange.drawn_kwh = actual;
            exchange.delivered_kwh = (actual - loss).max(0.0) * self.efficiency_discharge;
            exchange.loss_kwh = loss.min(actual);
        }

        // Self-discharge never eats into the reserve below min_soc.
        let above_floor = (self.storage_kwh - self.floor_kwh()).max(0.0);
        let leak = (self.storage_kwh * self.self_discharge_rate * dt_h).min(above_floor);
        self.storage_kwh -= leak;
        exchange.self_discharge_kwh = leak;

        debug_assert!(
            self.storage_kwh >= self.floor_kwh() - 1e-9
                && self.storage_kwh <= self.ceiling_kwh() + 1e-9,
            "storage {} kWh left the SOC window",
            self.storage_kwh
        );
        self.storage_kwh = self
            .storage_kwh
            .clamp(self.floor_kwh(), self.ceiling_kwh());

        exchange
    }
}

fn invalid(field: &str, message: &str) -> crate::Error {
    ConfigError::new(field, message).into()
}
