use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::{Baseline, ScenarioConfig};
use crate::devices::Battery;
use crate::error::{Error, Result};
use crate::market::{PriceGrid, PriceSeries};
use crate::series::EnergySeries;
use crate::sim::controller::Policy;
use crate::sim::engine::Engine;
use crate::sim::kpi::{ScenarioMetrics, Tariff};
use crate::sim::types::{Decision, StepRecord};

/// Result of a capacity sweep: baseline rows first, then one row per
/// capacity in configured order.
#[derive(Debug, Clone)]
pub struct ScenarioTable {
    /// Name of the policy that drove the runs.
    pub policy: &'static str,
    pub rows: Vec<ScenarioMetrics>,
    /// Number of leading baseline rows.
    pub baseline_rows: usize,
}

impl ScenarioTable {
    pub fn baselines(&self) -> &[ScenarioMetrics] {
        &self.rows[..self.baseline_rows]
    }

    pub fn capacities(&self) -> &[ScenarioMetrics] {
        &self.rows[self.baseline_rows..]
    }
}

/// Runs a scenario across battery capacities and compares the results.
///
/// Owns the driver series and the price grid; every run borrows them
/// read-only and builds its own battery and policy.
#[derive(Debug, Clone)]
pub struct BatteryAnalytics {
    config: ScenarioConfig,
    series: EnergySeries,
    market: PriceGrid,
    tariff: Tariff,
}

impl BatteryAnalytics {
    /// Prepares a sweep.
    ///
    /// Spot prices are aligned to the series unless the scenario uses the
    /// fixed contract or no price series is given, in which case every step
    /// is priced at `fix_price + marketing_cost`.
    ///
    /// # Errors
    ///
    /// * [`Error::Configuration`] for the first invalid setting found
    /// * [`Error::DataMismatch`] if the prices belong to another year
    pub fn new(
        config: ScenarioConfig,
        series: EnergySeries,
        prices: Option<&PriceSeries>,
    ) -> Result<Self> {
        if let Some(error) = config.validate().into_iter().next() {
            return Err(error.into());
        }

        let market_cfg = &config.market;
        let marketing_cost = market_cfg.marketing_cost_eur_per_kwh;
        let market = match prices {
            Some(prices) if !market_cfg.fix_contract => {
                let year = config.simulation.year;
                if prices.year() != year {
                    return Err(Error::DataMismatch {
                        expected: year,
                        found: prices.year(),
                    });
                }
                if prices.filled_count() > 0 {
                    warn!(
                        filled = prices.filled_count(),
                        "price series contains mean-filled samples"
                    );
                }
                PriceGrid::align(&series, prices, marketing_cost)
            }
            _ => {
                debug!(
                    fix_price = market_cfg.fix_price_eur_per_kwh(),
                    "pricing every step at the fixed contract price"
                );
                PriceGrid::fixed(&series, market_cfg.fix_price_eur_per_kwh(), marketing_cost)
            }
        };

        let tariff = Tariff {
            fix_price: market_cfg.fix_price_eur_per_kwh(),
            marketing_cost,
        };
        Ok(Self {
            config,
            series,
            market,
            tariff,
        })
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    pub fn series(&self) -> &EnergySeries {
        &self.series
    }

    pub fn market(&self) -> &PriceGrid {
        &self.market
    }

    pub fn tariff(&self) -> &Tariff {
        &self.tariff
    }

    /// Power ceiling used for `capacity_kwh`: the configured power when the
    /// capacity is swept, otherwise the C-rate limit.
    pub fn power_for(&self, capacity_kwh: f64) -> f64 {
        self.config
            .sweep
            .entries(self.config.battery.max_c_rate)
            .into_iter()
            .find(|(kwh, _)| (kwh - capacity_kwh).abs() < 1e-9)
            .map_or(capacity_kwh * self.config.battery.max_c_rate, |(_, kw)| kw)
    }

    /// Runs the engine for one battery; capacity 0 runs without battery.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the battery cannot be built.
    pub fn simulate(&self, capacity_kwh: f64, power_kw: f64) -> Result<Vec<StepRecord>> {
        let battery = if capacity_kwh > 0.0 {
            Some(Battery::new(&self.config.battery, capacity_kwh, power_kw)?)
        } else {
            None
        };
        let policy = Policy::from_config(&self.config.policy);
        let mut engine = Engine::new(&self.series, &self.market, battery, policy)?;
        Ok(engine.run())
    }

    /// Step records of a baseline row.
    ///
    /// # Errors
    ///
    /// Propagates engine errors for [`Baseline::NoBattery`].
    pub fn baseline_records(&self, baseline: Baseline) -> Result<Vec<StepRecord>> {
        let passive = |export_all: bool| -> Vec<StepRecord> {
            (0..self.series.len())
                .map(|i| {
                    let renew = self.series.renew_kwh()[i];
                    let demand = self.series.demand_kwh()[i];
                    let export = if export_all { renew.max(0.0) } else { 0.0 };
                    StepRecord {
                        index: i,
                        timestamp: self.series.timestamp(i),
                        renew_kwh: if export_all { renew } else { 0.0 },
                        demand_kwh: demand,
                        storage_kwh: 0.0,
                        soc: 0.0,
                        absorbed_kwh: 0.0,
                        delivered_kwh: 0.0,
                        export_kwh: export,
                        residual_kwh: demand.abs(),
                        loss_kwh: 0.0,
                        self_discharge_kwh: 0.0,
                        curtailed_kwh: 0.0,
                        exported: export > 0.0,
                        price: self.market.price(i),
                        decision: if export > 0.0 {
                            Decision::Export(export)
                        } else {
                            Decision::Idle
                        },
                    }
                })
                .collect()
        };

        match baseline {
            Baseline::NoRenewable => Ok(passive(false)),
            Baseline::AlwaysExport => Ok(passive(true)),
            Baseline::NoBattery => self.simulate(0.0, 0.0),
        }
    }

    fn metrics(
        &self,
        label: impl Into<String>,
        capacity_kwh: f64,
        power_kw: f64,
        records: &[StepRecord],
    ) -> ScenarioMetrics {
        ScenarioMetrics::from_records(
            label,
            capacity_kwh,
            power_kw,
            records,
            self.series.resolution_h(),
            &self.tariff,
        )
    }

    /// Runs every baseline and capacity and returns the comparison table.
    ///
    /// Capacities run on the rayon pool when `simulation.parallel` is set;
    /// the rows come back in configured order either way. Gains are taken
    /// against the `no bat` row, or the first swept capacity of zero.
    ///
    /// # Errors
    ///
    /// Returns the first error of any run; no partial table is produced.
    pub fn run(&self) -> Result<ScenarioTable> {
        let entries = self.config.sweep.entries(self.config.battery.max_c_rate);
        let baselines = &self.config.sweep.baselines;
        let parallel = self.config.simulation.parallel;
        let policy = Policy::from_config(&self.config.policy).name();
        info!(
            policy,
            steps = self.series.len(),
            baselines = baselines.len(),
            capacities = entries.len(),
            parallel,
            "starting capacity sweep"
        );

        let mut rows = Vec::with_capacity(baselines.len() + entries.len());
        let mut reference = None;
        for &baseline in baselines {
            let records = self.baseline_records(baseline)?;
            if baseline == Baseline::NoBattery && reference.is_none() {
                reference = Some(rows.len());
            }
            rows.push(self.metrics(baseline.label(), 0.0, 0.0, &records));
        }

        let evaluate = |&(capacity_kwh, power_kw): &(f64, f64)| -> Result<ScenarioMetrics> {
            let records = self.simulate(capacity_kwh, power_kw)?;
            let row = self.metrics(capacity_label(capacity_kwh), capacity_kwh, power_kw, &records);
            debug!(
                capacity_kwh,
                power_kw,
                autarky = row.autarky,
                revenue_eur = row.revenue_eur,
                "capacity run finished"
            );
            Ok(row)
        };
        let capacity_rows: Vec<ScenarioMetrics> = if parallel {
            entries.par_iter().map(&evaluate).collect::<Result<_>>()?
        } else {
            entries.iter().map(&evaluate).collect::<Result<_>>()?
        };

        let baseline_rows = rows.len();
        if reference.is_none() {
            reference = capacity_rows
                .iter()
                .position(|row| !row.has_battery())
                .map(|i| baseline_rows + i);
        }
        rows.extend(capacity_rows);

        match reference.map(|i| rows[i].clone()) {
            Some(reference) => {
                let flex = self.config.market.flex_premium_eur;
                for row in &mut rows {
                    row.compare_to(&reference, flex);
                }
            }
            None => warn!("no zero-capacity row to compare against; gains are left empty"),
        }

        info!(rows = rows.len(), "capacity sweep finished");
        Ok(ScenarioTable {
            policy,
            rows,
            baseline_rows,
        })
    }
}

/// Label of a capacity row, e.g. `"5000 kWh"`.
fn capacity_label(capacity_kwh: f64) -> String {
    format!("{capacity_kwh} kWh")
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{NaiveDate, TimeDelta};

    use super::*;
    use crate::config::PolicyKind;

    fn series(renew: f64, demand: f64) -> EnergySeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        EnergySeries::constant(start, TimeDelta::hours(1), 72, renew, demand).unwrap()
    }

    fn config() -> ScenarioConfig {
        let mut config = ScenarioConfig::default();
        config.simulation.parallel = false;
        config.sweep.capacities_mwh = vec![0.0, 1.0];
        config.sweep.baselines = vec![Baseline::NoRenewable, Baseline::AlwaysExport];
        config
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = config();
        config.battery.min_soc = 0.99;
        let result = BatteryAnalytics::new(config, series(1.0, 0.0), None);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn rejects_prices_of_another_year() {
        let prices = PriceSeries::synthetic(2023, 1).unwrap();
        let result = BatteryAnalytics::new(config(), series(1.0, 0.0), Some(&prices));
        assert!(matches!(
            result,
            Err(Error::DataMismatch {
                expected: 2024,
                found: 2023
            })
        ));
    }

    #[test]
    fn fixed_contract_ignores_spot_prices() {
        let mut config = config();
        config.market.fix_contract = true;
        let prices = PriceSeries::synthetic(2024, 1).unwrap();
        let analytics = BatteryAnalytics::new(config, series(1.0, 0.0), Some(&prices)).unwrap();
        assert!(analytics.market().prices().iter().all(|&p| (p - 0.11).abs() < 1e-12));
    }

    #[test]
    fn baselines_value_demand_and_generation() {
        let analytics = BatteryAnalytics::new(config(), series(10.0, 4.0), None).unwrap();

        let none = analytics.baseline_records(Baseline::NoRenewable).unwrap();
        assert!(none.iter().all(|r| r.residual_kwh == 4.0 && r.export_kwh == 0.0));

        let always = analytics.baseline_records(Baseline::AlwaysExport).unwrap();
        assert!(always.iter().all(|r| r.residual_kwh == 4.0 && r.export_kwh == 10.0 && r.exported));
    }

    #[test]
    fn rows_follow_configured_order() {
        let analytics = BatteryAnalytics::new(config(), series(100.0, 0.0), None).unwrap();
        let table = analytics.run().unwrap();
        let labels: Vec<&str> = table.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["no renew", "always", "0 kWh", "1000 kWh"]);
        assert_eq!(table.baselines().len(), 2);
        assert_eq!(table.capacities().len(), 2);
        assert_eq!(table.policy, "threshold");
    }

    #[test]
    fn gains_fall_back_to_zero_capacity_row() {
        let mut config = config();
        config.market.flex_premium_eur = 100.0;
        let analytics = BatteryAnalytics::new(config, series(100.0, 0.0), None).unwrap();
        let table = analytics.run().unwrap();
        let zero = &table.capacities()[0];
        assert_eq!(zero.revenue_gain_eur, Some(0.0));
        assert_eq!(zero.gain_eur_per_kwh, None);
        let battery = &table.capacities()[1];
        let gain = battery.revenue_gain_eur.unwrap();
        assert_abs_diff_eq!(gain, battery.revenue_eur - zero.revenue_eur + 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(battery.gain_eur_per_kwh.unwrap(), gain / 1000.0, epsilon = 1e-12);
    }

    #[test]
    fn parallel_and_sequential_sweeps_agree() {
        let mut config = config();
        config.policy.kind = PolicyKind::DynamicDischarge;
        config.sweep.capacities_mwh = vec![0.0, 0.5, 1.0, 2.0];
        let prices = PriceSeries::synthetic(2024, 7).unwrap();

        let sequential = BatteryAnalytics::new(config.clone(), series(300.0, 0.0), Some(&prices))
            .unwrap()
            .run()
            .unwrap();
        config.simulation.parallel = true;
        let parallel = BatteryAnalytics::new(config, series(300.0, 0.0), Some(&prices))
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(sequential.rows, parallel.rows);
    }

    #[test]
    fn power_for_prefers_configured_power() {
        let mut config = config();
        config.sweep.powers_mw = Some(vec![0.1, 0.2]);
        let analytics = BatteryAnalytics::new(config, series(1.0, 0.0), None).unwrap();
        assert_abs_diff_eq!(analytics.power_for(1000.0), 200.0, epsilon = 1e-9);
        assert_abs_diff_eq!(analytics.power_for(4000.0), 2000.0, epsilon = 1e-9);
    }
}
