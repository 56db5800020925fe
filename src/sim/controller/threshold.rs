use crate::sim::types::StepContext;

use super::Controller;

/// Trades around the rolling reference price.
///
/// Discharges when `price >= (load_threshold + hysteresis) * avg_price` and
/// charges when `price <= (load_threshold - hysteresis) * avg_price`. With
/// zero hysteresis the charge side is strict (`price < load_threshold *
/// avg_price`) so every price falls on exactly one side. Prices inside the
/// band leave the battery idle. Surplus is never exported outside a
/// discharge step.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdPolicy {
    pub load_threshold: f64,
    pub hysteresis: f64,
}

impl ThresholdPolicy {
    pub fn new(load_threshold: f64, hysteresis: f64) -> Self {
        Self {
            load_threshold,
            hysteresis: hysteresis.max(0.0),
        }
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

impl Controller for ThresholdPolicy {
    fn should_discharge(&self, ctx: &StepContext) -> bool {
        ctx.price >= (self.load_threshold + self.hysteresis) * ctx.avg_price
    }

    fn should_charge(&self, ctx: &StepContext) -> bool {
        if self.hysteresis > 0.0 {
            ctx.price <= (self.load_threshold - self.hysteresis) * ctx.avg_price
        } else {
            ctx.price < self.load_threshold * ctx.avg_price
        }
    }

    fn should_export(&self, _ctx: &StepContext) -> bool {
        false
    }

    /// Renewable surplus after local demand, limited by the charge room.
    fn charge_amount(&self, ctx: &StepContext) -> f64 {
        ctx.surplus_kwh().min(ctx.charge_room())
    }

    fn discharge_amount(&self, ctx: &StepContext) -> f64 {
        ctx.discharge_room()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::sim::controller::fixtures::context;
    use crate::sim::types::Decision;

    #[test]
    fn without_hysteresis_every_price_is_decided() {
        let policy = ThresholdPolicy::default();
        assert_eq!(policy.decide(&context(0, 0.10, 0.10)).label(), "discharge");
        assert_eq!(policy.decide(&context(0, 0.099, 0.10)).label(), "charge");
    }

    #[test]
    fn band_leaves_battery_idle() {
        let policy = ThresholdPolicy::new(1.0, 0.05);
        assert_eq!(policy.decide(&context(0, 0.102, 0.10)), Decision::Idle);
        assert_eq!(policy.decide(&context(0, 0.098, 0.10)), Decision::Idle);
        assert_eq!(policy.decide(&context(0, 0.106, 0.10)).label(), "discharge");
        assert_eq!(policy.decide(&context(0, 0.094, 0.10)).label(), "charge");
    }

    #[test]
    fn charge_is_limited_by_renewable_and_room() {
        let policy = ThresholdPolicy::default();
        let mut ctx = context(0, 0.05, 0.10);
        assert_eq!(policy.charge_amount(&ctx), 300.0);
        ctx.storage_kwh = 900.0;
        assert_abs_diff_eq!(policy.charge_amount(&ctx), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn charge_leaves_demand_served() {
        let policy = ThresholdPolicy::default();
        let mut ctx = context(0, 0.05, 0.10);
        ctx.demand_kwh = 80.0;
        assert_abs_diff_eq!(policy.charge_amount(&ctx), 220.0, epsilon = 1e-9);
        ctx.demand_kwh = 400.0;
        assert_eq!(policy.charge_amount(&ctx), 0.0);
    }

    #[test]
    fn discharge_empties_to_floor() {
        let policy = ThresholdPolicy::default();
        let mut ctx = context(0, 0.2, 0.10);
        ctx.storage_kwh = 120.0;
        assert_abs_diff_eq!(policy.discharge_amount(&ctx), 70.0, epsilon = 1e-9);
    }
}
