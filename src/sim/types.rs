//! Core simulation types: step context, decisions and step records.

use std::fmt;

use chrono::NaiveDateTime;

/// Read-only snapshot of one timestep handed to the controller.
///
/// Carries the battery limits so policies can size requests without
/// holding battery state. Without a battery every capacity-related field
/// is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct StepContext {
    /// Step index into the series.
    pub index: usize,
    /// Local time at the start of the step.
    pub timestamp: NaiveDateTime,
    /// Renewable generation during the step (kWh).
    pub renew_kwh: f64,
    /// Local demand during the step (kWh).
    pub demand_kwh: f64,
    /// Spot price including marketing cost (€/kWh).
    pub price: f64,
    /// Reference price including marketing cost (€/kWh).
    pub avg_price: f64,
    /// Stored energy before the step (kWh).
    pub storage_kwh: f64,
    /// Battery capacity (kWh).
    pub capacity_kwh: f64,
    /// `storage_kwh / capacity_kwh`, 0 without a battery.
    pub soc: f64,
    pub min_soc: f64,
    pub max_soc: f64,
    /// Step length (h).
    pub resolution_h: f64,
    /// Energy the battery may move in one step (kWh).
    pub power_limit_kwh: f64,
}

impl StepContext {
    /// Lowest admissible storage level (kWh).
    pub fn floor_kwh(&self) -> f64 {
        self.min_soc * self.capacity_kwh
    }

    /// Highest admissible storage level (kWh).
    pub fn ceiling_kwh(&self) -> f64 {
        self.max_soc * self.capacity_kwh
    }

    /// Energy that can be charged this step (kWh, >= 0).
    pub fn charge_room(&self) -> f64 {
        self.power_limit_kwh
            .min(self.ceiling_kwh() - self.storage_kwh)
            .max(0.0)
    }

    /// Energy that can be discharged this step (kWh, >= 0).
    pub fn discharge_room(&self) -> f64 {
        self.power_limit_kwh
            .min(self.storage_kwh - self.floor_kwh())
            .max(0.0)
    }

    /// Renewable energy left after covering local demand (kWh, >= 0).
    pub fn surplus_kwh(&self) -> f64 {
        (self.renew_kwh - self.demand_kwh.abs()).max(0.0)
    }
}

/// What the controller wants done in one step, with the requested energy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    Discharge(f64),
    Charge(f64),
    Export(f64),
    Idle,
}

impl Decision {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Discharge(_) => "discharge",
            Self::Charge(_) => "charge",
            Self::Export(_) => "export",
            Self::Idle => "idle",
        }
    }
}

/// Complete record of one simulation timestep.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    /// Step index.
    pub index: usize,
    /// Local time at the start of the step.
    pub timestamp: NaiveDateTime,
    /// Renewable generation (kWh).
    pub renew_kwh: f64,
    /// Local demand (kWh).
    pub demand_kwh: f64,
    /// Stored energy after the step (kWh).
    pub storage_kwh: f64,
    /// SOC after the step (0.0 to 1.0, 0 without a battery).
    pub soc: f64,
    /// Energy taken in by the battery (kWh).
    pub absorbed_kwh: f64,
    /// Energy delivered by the battery after losses (kWh).
    pub delivered_kwh: f64,
    /// Energy sold to the grid (kWh).
    pub export_kwh: f64,
    /// Demand not covered locally (kWh).
    pub residual_kwh: f64,
    /// Conduction loss (kWh).
    pub loss_kwh: f64,
    /// Self-discharge (kWh).
    pub self_discharge_kwh: f64,
    /// Renewable energy neither stored, consumed nor exported (kWh).
    pub curtailed_kwh: f64,
    /// Whether energy was exported during the step.
    pub exported: bool,
    /// Spot price including marketing cost (€/kWh).
    pub price: f64,
    pub decision: Decision,
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>5} {} | {:<9} | renew={:>9.2}  demand={:>9.2} | \
             in={:>8.2}  out={:>8.2}  export={:>9.2}  residual={:>8.2} | \
             SoC={:>5.1}%  price={:.4} €/kWh",
            self.index,
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.decision.label(),
            self.renew_kwh,
            self.demand_kwh,
            self.absorbed_kwh,
            self.delivered_kwh,
            self.export_kwh,
            self.residual_kwh,
            self.soc * 100.0,
            self.price,
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn context() -> StepContext {
        StepContext {
            index: 0,
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap(),
            renew_kwh: 100.0,
            demand_kwh: 0.0,
            price: 0.1,
            avg_price: 0.1,
            storage_kwh: 500.0,
            capacity_kwh: 1000.0,
            soc: 0.5,
            min_soc: 0.05,
            max_soc: 0.95,
            resolution_h: 1.0,
            power_limit_kwh: 500.0,
        }
    }

    #[test]
    fn rooms_respect_power_limit() {
        let ctx = context();
        assert_eq!(ctx.charge_room(), 450.0);
        assert_eq!(ctx.discharge_room(), 450.0);

        let ctx = StepContext {
            power_limit_kwh: 100.0,
            ..context()
        };
        assert_eq!(ctx.charge_room(), 100.0);
        assert_eq!(ctx.discharge_room(), 100.0);
    }

    #[test]
    fn rooms_are_zero_without_battery() {
        let ctx = StepContext {
            storage_kwh: 0.0,
            capacity_kwh: 0.0,
            soc: 0.0,
            min_soc: 0.0,
            max_soc: 0.0,
            power_limit_kwh: 0.0,
            ..context()
        };
        assert_eq!(ctx.charge_room(), 0.0);
        assert_eq!(ctx.discharge_room(), 0.0);
    }

    #[test]
    fn surplus_nets_out_demand() {
        let ctx = StepContext {
            demand_kwh: -30.0,
            ..context()
        };
        assert_eq!(ctx.surplus_kwh(), 70.0);
    }

    #[test]
    fn step_record_display_does_not_panic() {
        let r = StepRecord {
            index: 3,
            timestamp: context().timestamp,
            renew_kwh: 1.0,
            demand_kwh: 0.0,
            storage_kwh: 2.0,
            soc: 0.5,
            absorbed_kwh: 1.0,
            delivered_kwh: 0.0,
            export_kwh: 0.0,
            residual_kwh: 0.0,
            loss_kwh: 0.0,
            self_discharge_kwh: 0.0,
            curtailed_kwh: 0.0,
            exported: false,
            price: 0.1,
            decision: Decision::Charge(1.0),
        };
        let s = format!("{r}");
        assert!(s.contains("charge"));
    }
}
