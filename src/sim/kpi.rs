//! Post-hoc financial and energy metrics from simulation records.

use std::fmt;

use super::types::StepRecord;

/// Prices needed to value a run besides the per-step spot price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tariff {
    /// Fixed contract price (€/kWh).
    pub fix_price: f64,
    /// Offset included in every spot price (€/kWh).
    pub marketing_cost: f64,
}

/// Aggregate metrics of one row of the capacity sweep.
///
/// Computed post-hoc from `&[StepRecord]` so reported totals always match
/// the step data. The comparison fields stay `None` until
/// [`ScenarioMetrics::compare_to`] sets them against the reference row.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioMetrics {
    /// Row label: a baseline name or the capacity.
    pub label: String,
    /// Battery capacity (kWh), 0 for baselines.
    pub capacity_kwh: f64,
    /// Battery power limit (kW), 0 for baselines.
    pub power_kw: f64,
    /// Demand bought from the grid (kWh).
    pub residual_kwh: f64,
    /// Energy sold to the grid (kWh).
    pub export_kwh: f64,
    /// Hours with any export.
    pub export_hours: f64,
    /// Conduction loss (kWh).
    pub loss_kwh: f64,
    /// Self-discharge (kWh).
    pub self_discharge_kwh: f64,
    /// Renewable energy thrown away (kWh).
    pub curtailed_kwh: f64,
    /// Battery throughput, charged plus delivered (kWh).
    pub throughput_kwh: f64,
    /// Throughput over twice the capacity.
    pub equivalent_cycles: f64,
    /// Share of demand met without grid import.
    pub autarky: f64,
    /// Residual demand valued at spot prices (€).
    pub spot_cost_eur: f64,
    /// Residual demand valued at the fixed contract price (€).
    pub fix_cost_eur: f64,
    /// Export valued at spot prices net of marketing cost (€).
    pub revenue_eur: f64,
    /// Revenue gained over the reference row, flex premium included (€).
    pub revenue_gain_eur: Option<f64>,
    /// Revenue gain per kWh of capacity (€/kWh).
    pub gain_eur_per_kwh: Option<f64>,
    /// Spot cost saved per kWh of capacity (€/kWh).
    pub spot_saving_eur_per_kwh: Option<f64>,
    /// Fixed-price cost saved per kWh of capacity (€/kWh).
    pub fix_saving_eur_per_kwh: Option<f64>,
}

impl ScenarioMetrics {
    /// Reduces the records of one run.
    ///
    /// # Arguments
    ///
    /// * `label` - Row label
    /// * `capacity_kwh` - Battery capacity, 0 without battery
    /// * `power_kw` - Battery power limit, 0 without battery
    /// * `records` - Complete step records of the run
    /// * `resolution_h` - Step length in hours
    /// * `tariff` - Fixed price and marketing cost
    pub fn from_records(
        label: impl Into<String>,
        capacity_kwh: f64,
        power_kw: f64,
        records: &[StepRecord],
        resolution_h: f64,
        tariff: &Tariff,
    ) -> Self {
        let mut demand = 0.0;
        let mut residual = 0.0;
        let mut export = 0.0;
        let mut export_steps = 0_usize;
        let mut loss = 0.0;
        let mut self_discharge = 0.0;
        let mut curtailed = 0.0;
        let mut throughput = 0.0;
        let mut spot_cost = 0.0;
        let mut revenue = 0.0;

        for r in records {
            demand += r.demand_kwh.abs();
            residual += r.residual_kwh;
            export += r.export_kwh;
            if r.exported {
                export_steps += 1;
            }
            loss += r.loss_kwh;
            self_discharge += r.self_discharge_kwh;
            curtailed += r.curtailed_kwh;
            throughput += r.absorbed_kwh + r.delivered_kwh;
            spot_cost += r.residual_kwh * r.price;
            revenue += r.export_kwh * (r.price - tariff.marketing_cost);
        }

        let autarky = if demand > 0.0 {
            1.0 - residual / demand
        } else {
            1.0
        };
        let equivalent_cycles = if capacity_kwh > 0.0 {
            throughput / (2.0 * capacity_kwh)
        } else {
            0.0
        };

        Self {
            label: label.into(),
            capacity_kwh,
            power_kw,
            residual_kwh: residual,
            export_kwh: export,
            export_hours: export_steps as f64 * resolution_h,
            loss_kwh: loss,
            self_discharge_kwh: self_discharge,
            curtailed_kwh: curtailed,
            throughput_kwh: throughput,
            equivalent_cycles,
            autarky,
            spot_cost_eur: spot_cost,
            fix_cost_eur: residual * tariff.fix_price,
            revenue_eur: revenue,
            revenue_gain_eur: None,
            gain_eur_per_kwh: None,
            spot_saving_eur_per_kwh: None,
            fix_saving_eur_per_kwh: None,
        }
    }

    /// Revenue minus spot cost (€).
    pub fn spot_profit_eur(&self) -> f64 {
        self.revenue_eur - self.spot_cost_eur
    }

    /// Revenue minus fixed-price cost (€).
    pub fn fix_profit_eur(&self) -> f64 {
        self.revenue_eur - self.fix_cost_eur
    }

    pub fn has_battery(&self) -> bool {
        self.capacity_kwh > 0.0
    }

    /// Fills the comparison fields against `reference`.
    ///
    /// Rows with a battery also receive the annual `flex_premium_eur`. The
    /// per-kWh figures are only defined for rows with a battery.
    pub fn compare_to(&mut self, reference: &ScenarioMetrics, flex_premium_eur: f64) {
        let mut gain = self.revenue_eur - reference.revenue_eur;
        if !self.has_battery() {
            self.revenue_gain_eur = Some(gain);
            return;
        }
        gain += flex_premium_eur;
        let per_kwh = |value: f64| value / self.capacity_kwh;
        self.revenue_gain_eur = Some(gain);
        self.gain_eur_per_kwh = Some(per_kwh(gain));
        self.spot_saving_eur_per_kwh = Some(per_kwh(reference.spot_cost_eur - self.spot_cost_eur));
        self.fix_saving_eur_per_kwh = Some(per_kwh(reference.fix_cost_eur - self.fix_cost_eur));
    }
}

impl fmt::Display for ScenarioMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- {} ---", self.label)?;
        writeln!(
            f,
            "Battery:               {:.1} kWh / {:.1} kW",
            self.capacity_kwh, self.power_kw
        )?;
        writeln!(f, "Residual demand:       {:.2} kWh", self.residual_kwh)?;
        writeln!(
            f,
            "Export:                {:.2} kWh in {:.1} h",
            self.export_kwh, self.export_hours
        )?;
        writeln!(f, "Curtailed:             {:.2} kWh", self.curtailed_kwh)?;
        writeln!(
            f,
            "Losses:                {:.2} kWh conduction, {:.2} kWh self-discharge",
            self.loss_kwh, self.self_discharge_kwh
        )?;
        writeln!(
            f,
            "Battery throughput:    {:.2} kWh ({:.2} equiv. cycles)",
            self.throughput_kwh, self.equivalent_cycles
        )?;
        writeln!(f, "Autarky:               {:.1}%", self.autarky * 100.0)?;
        writeln!(
            f,
            "Cost:                  {:.2} € spot, {:.2} € fixed",
            self.spot_cost_eur, self.fix_cost_eur
        )?;
        write!(f, "Revenue:               {:.2} €", self.revenue_eur)?;
        if let Some(gain) = self.revenue_gain_eur {
            write!(f, "\nRevenue gain:          {gain:.2} €")?;
        }
        if let Some(per_kwh) = self.gain_eur_per_kwh {
            write!(f, " ({per_kwh:.2} €/kWh)")?;
        }
        Ok(())
    }
}
