//! Simulation engine that drives one battery through an energy series.

use crate::devices::{Battery, Exchange};
use crate::error::{Error, Result};
use crate::market::PriceGrid;
use crate::series::EnergySeries;

use super::controller::Controller;
use super::types::{Decision, StepContext, StepRecord};

/// Simulation engine owning the battery and the controller of one run.
///
/// Generic over `C: Controller` for static dispatch. The series and the
/// price grid are borrowed read-only so a sweep can share them across
/// runs. A run without a battery (`None`) uses the same loop with zero
/// feasible energy.
pub struct Engine<'a, C: Controller> {
    series: &'a EnergySeries,
    market: &'a PriceGrid,
    battery: Option<Battery>,
    controller: C,
}

impl<'a, C: Controller> Engine<'a, C> {
    /// Creates a new simulation engine.
    ///
    /// # Arguments
    ///
    /// * `series` - Renewable generation and demand per step
    /// * `market` - Prices aligned to `series`
    /// * `battery` - Storage device, or `None` for a run without battery
    /// * `controller` - Control policy
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSeries`] if the price grid does not cover the
    /// series step for step.
    pub fn new(
        series: &'a EnergySeries,
        market: &'a PriceGrid,
        battery: Option<Battery>,
        controller: C,
    ) -> Result<Self> {
        if series.len() != market.len() {
            return Err(Error::InvalidSeries(format!(
                "series has {} steps, price grid has {}",
                series.len(),
                market.len()
            )));
        }
        Ok(Self {
            series,
            market,
            battery,
            controller,
        })
    }

    /// Snapshot handed to the controller at step `index`.
    pub fn context(&self, index: usize) -> StepContext {
        let resolution_h = self.series.resolution_h();
        let (storage_kwh, capacity_kwh, soc, min_soc, max_soc, power_limit_kwh) =
            match &self.battery {
                Some(b) => (
                    b.storage_kwh(),
                    b.capacity_kwh,
                    b.soc(),
                    b.min_soc,
                    b.max_soc,
                    b.p_max_kw * resolution_h,
                ),
                None => (0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
            };

        StepContext {
            index,
            timestamp: self.series.timestamp(index),
            renew_kwh: self.series.renew_kwh()[index],
            demand_kwh: self.series.demand_kwh()[index],
            price: self.market.price(index),
            avg_price: self.market.reference(index),
            storage_kwh,
            capacity_kwh,
            soc,
            min_soc,
            max_soc,
            resolution_h,
            power_limit_kwh,
        }
    }

    /// Executes one simulation timestep and returns its record.
    ///
    /// The controller observes the market first, then its decision is
    /// carried out in priority order (discharge, charge, export, idle).
    /// Renewable energy always covers demand before it is exported or
    /// curtailed.
    pub fn step(&mut self, index: usize) -> StepRecord {
        let ctx = self.context(index);
        self.controller.observe(&ctx, self.market);
        let decision = self.controller.decide(&ctx);

        let dt = ctx.resolution_h;
        let demand = ctx.demand_kwh.abs();
        let renew = ctx.renew_kwh;

        let (exchange, export_kwh, curtailed_kwh) = match decision {
            Decision::Discharge(amount) => {
                let exchange = self.execute(0.0, amount, dt);
                let export = (renew + exchange.delivered_kwh - demand).max(0.0);
                (exchange, export, 0.0)
            }
            Decision::Charge(amount) => {
                let exchange = self.execute(amount, 0.0, dt);
                let leftover = (renew - exchange.absorbed_kwh - demand).max(0.0);
                if self.controller.should_export(&ctx) {
                    (exchange, leftover, 0.0)
                } else {
                    (exchange, 0.0, leftover)
                }
            }
            Decision::Export(_) => {
                let exchange = self.execute(0.0, 0.0, dt);
                (exchange, ctx.surplus_kwh(), 0.0)
            }
            Decision::Idle => {
                let exchange = self.execute(0.0, 0.0, dt);
                (exchange, 0.0, ctx.surplus_kwh())
            }
        };

        // Energy taken by the battery is no longer available for demand.
        let local_supply = renew - exchange.absorbed_kwh + exchange.delivered_kwh;
        let residual_kwh = (demand - local_supply).max(0.0);
        let (storage_kwh, soc) = self
            .battery
            .as_ref()
            .map_or((0.0, 0.0), |b| (b.storage_kwh(), b.soc()));

        StepRecord {
            index,
            timestamp: ctx.timestamp,
            renew_kwh: renew,
            demand_kwh: ctx.demand_kwh,
            storage_kwh,
            soc,
            absorbed_kwh: exchange.absorbed_kwh,
            delivered_kwh: exchange.delivered_kwh,
            export_kwh,
            residual_kwh,
            loss_kwh: exchange.loss_kwh,
            self_discharge_kwh: exchange.self_discharge_kwh,
            curtailed_kwh,
            exported: export_kwh > 0.0,
            price: ctx.price,
            decision,
        }
    }

    /// Resets the battery to 50% SOC and runs every step of the series.
    pub fn run(&mut self) -> Vec<StepRecord> {
        if let Some(battery) = self.battery.as_mut() {
            battery.reset();
        }
        let mut records = Vec::with_capacity(self.series.len());
        let mut clock = self.series.clock();
        clock.run(|index, _| records.push(self.step(index)));
        records
    }

    /// Returns the battery, if the run has one.
    pub fn battery(&self) -> Option<&Battery> {
        self.battery.as_ref()
    }

    fn execute(&mut self, charge_kwh: f64, discharge_kwh: f64, dt_h: f64) -> Exchange {
        match self.battery.as_mut() {
            Some(battery) => battery.execute(charge_kwh, discharge_kwh, dt_h),
            None => Exchange::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{NaiveDate, TimeDelta};

    use super::*;
    use crate::config::BatteryConfig;
    use crate::sim::controller::{DynamicDischargePolicy, ThresholdPolicy};

    fn start() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    fn lossless() -> BatteryConfig {
        BatteryConfig {
            efficiency_charge: 1.0,
            efficiency_discharge: 1.0,
            self_discharge_rate: 0.0,
            internal_resistance_ohm: 0.0,
            ..BatteryConfig::default()
        }
    }

    #[test]
    fn rejects_misaligned_price_grid() {
        let series = EnergySeries::constant(start(), TimeDelta::hours(1), 4, 1.0, 0.0).unwrap();
        let short = EnergySeries::constant(start(), TimeDelta::hours(1), 3, 1.0, 0.0).unwrap();
        let market = PriceGrid::fixed(&short, 0.1, 0.0);
        let result = Engine::new(&series, &market, None, ThresholdPolicy::default());
        assert!(matches!(result, Err(Error::InvalidSeries(_))));
    }

    #[test]
    fn without_battery_all_renewable_is_exported() {
        let series =
            EnergySeries::constant(start(), TimeDelta::hours(1), 48, 1000.0, 0.0).unwrap();
        let market = PriceGrid::fixed(&series, 0.1, 0.0);
        let policy = DynamicDischargePolicy::new(0.7, 0.05, 3);
        let mut engine = Engine::new(&series, &market, None, policy).unwrap();
        let records = engine.run();

        assert_eq!(records.len(), 48);
        let exported: f64 = records.iter().map(|r| r.export_kwh).sum();
        assert_abs_diff_eq!(exported, 48_000.0, epsilon = 1e-6);
        assert!(records.iter().all(|r| r.residual_kwh == 0.0 && r.exported));
    }

    #[test]
    fn threshold_without_battery_curtails_when_cheap() {
        let series = EnergySeries::constant(start(), TimeDelta::hours(1), 2, 10.0, 0.0).unwrap();
        let market = PriceGrid::fixed(&series, 0.1, 0.0);
        // Price below 1.1 x reference: charge branch with nothing to absorb.
        let mut engine =
            Engine::new(&series, &market, None, ThresholdPolicy::new(1.1, 0.0)).unwrap();
        let records = engine.run();
        assert_eq!(records[0].decision.label(), "charge");
        assert_eq!(records[0].export_kwh, 0.0);
        assert_eq!(records[0].curtailed_kwh, 10.0);
    }

    #[test]
    fn storage_change_matches_exchange() {
        let series = EnergySeries::constant(start(), TimeDelta::hours(1), 24, 400.0, 0.0).unwrap();
        let prices: Vec<f64> = (0..24).map(|h| if h < 12 { 0.05 } else { 0.30 }).collect();
        let hourly = crate::market::PriceSeries::new(start(), prices).unwrap();
        let market = PriceGrid::align(&series, &hourly, 0.0);
        let battery = Battery::new(&BatteryConfig::default(), 1000.0, 500.0).unwrap();
        let mut engine =
            Engine::new(&series, &market, Some(battery), ThresholdPolicy::default()).unwrap();

        let mut before = 500.0;
        for record in engine.run() {
            let stored = if record.absorbed_kwh > 0.0 {
                (record.absorbed_kwh - record.loss_kwh).max(0.0) * 0.96
            } else {
                0.0
            };
            let drawn = if record.decision.label() == "discharge" {
                record.delivered_kwh / 0.96 + record.loss_kwh
            } else {
                0.0
            };
            let expected = before + stored - drawn - record.self_discharge_kwh;
            assert_abs_diff_eq!(record.storage_kwh, expected, epsilon = 1e-6);
            before = record.storage_kwh;
        }
    }

    #[test]
    fn lossless_round_trip_exports_stored_energy() {
        let series = EnergySeries::constant(start(), TimeDelta::hours(1), 2, 100.0, 0.0).unwrap();
        let hourly = crate::market::PriceSeries::new(start(), vec![0.05, 0.30]).unwrap();
        let market = PriceGrid::align(&series, &hourly, 0.0);
        let battery = Battery::new(&lossless(), 1000.0, 500.0).unwrap();
        let mut engine =
            Engine::new(&series, &market, Some(battery), ThresholdPolicy::default()).unwrap();
        let records = engine.run();

        // Cheap hour: 100 kWh stored. Dear hour: 450 + 100 kWh leave.
        assert_eq!(records[0].absorbed_kwh, 100.0);
        assert_abs_diff_eq!(records[0].storage_kwh, 600.0, epsilon = 1e-9);
        assert_abs_diff_eq!(records[1].delivered_kwh, 500.0, epsilon = 1e-9);
        assert_abs_diff_eq!(records[1].export_kwh, 600.0, epsilon = 1e-9);
        assert_abs_diff_eq!(records[1].storage_kwh, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn run_resets_battery() {
        let series = EnergySeries::constant(start(), TimeDelta::hours(1), 3, 100.0, 0.0).unwrap();
        let market = PriceGrid::fixed(&series, 0.1, 0.0);
        let battery = Battery::new(&lossless(), 1000.0, 500.0).unwrap();
        let mut engine =
            Engine::new(&series, &market, Some(battery), ThresholdPolicy::default()).unwrap();
        let first = engine.run();
        let second = engine.run();
        assert_eq!(first, second);
        assert!(engine.battery().is_some());
    }

    #[test]
    fn charging_with_demand_keeps_the_site_balanced() {
        let series = EnergySeries::new(
            start(),
            TimeDelta::hours(1),
            vec![100.0, 100.0],
            vec![80.0, 80.0],
        )
        .unwrap();
        let hourly = crate::market::PriceSeries::new(start(), vec![0.05, 0.30]).unwrap();
        let market = PriceGrid::align(&series, &hourly, 0.0);
        let battery = Battery::new(&lossless(), 1000.0, 500.0).unwrap();
        let mut engine =
            Engine::new(&series, &market, Some(battery), ThresholdPolicy::default()).unwrap();
        let records = engine.run();

        assert_eq!(records[0].decision, Decision::Charge(20.0));
        assert_eq!(records[0].absorbed_kwh, 20.0);
        assert_eq!(records[0].residual_kwh, 0.0);
        for r in &records {
            let supply = r.renew_kwh + r.residual_kwh + r.delivered_kwh;
            let usage = r.absorbed_kwh + r.export_kwh + r.curtailed_kwh + r.demand_kwh.abs();
            assert_abs_diff_eq!(supply, usage, epsilon = 1e-9);
        }
    }

    /// A controller that always charges the full generation.
    struct GreedyCharger;

    impl Controller for GreedyCharger {
        fn should_discharge(&self, _ctx: &StepContext) -> bool {
            false
        }
        fn should_charge(&self, _ctx: &StepContext) -> bool {
            true
        }
        fn should_export(&self, _ctx: &StepContext) -> bool {
            false
        }
        fn charge_amount(&self, ctx: &StepContext) -> f64 {
            ctx.renew_kwh
        }
        fn discharge_amount(&self, _ctx: &StepContext) -> f64 {
            0.0
        }
    }

    #[test]
    fn absorbed_energy_does_not_cover_demand() {
        let series = EnergySeries::constant(start(), TimeDelta::hours(1), 1, 100.0, 80.0).unwrap();
        let market = PriceGrid::fixed(&series, 0.1, 0.0);
        let battery = Battery::new(&lossless(), 1000.0, 500.0).unwrap();
        let mut engine = Engine::new(&series, &market, Some(battery), GreedyCharger).unwrap();
        let record = engine.step(0);

        assert_eq!(record.absorbed_kwh, 100.0);
        assert_abs_diff_eq!(record.residual_kwh, 80.0, epsilon = 1e-9);
    }

    #[test]
    fn demand_is_covered_before_export() {
        let series = EnergySeries::new(
            start(),
            TimeDelta::hours(1),
            vec![100.0, 20.0],
            vec![-60.0, 50.0],
        )
        .unwrap();
        let market = PriceGrid::fixed(&series, 0.1, 0.0);
        let policy = DynamicDischargePolicy::new(0.7, 0.05, 3);
        let mut engine = Engine::new(&series, &market, None, policy).unwrap();
        let records = engine.run();
        assert_eq!(records[0].export_kwh, 40.0);
        assert_eq!(records[0].residual_kwh, 0.0);
        assert_eq!(records[1].export_kwh, 0.0);
        assert_eq!(records[1].residual_kwh, 30.0);
    }
}
