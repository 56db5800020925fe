use chrono::{NaiveDate, Timelike};
use tracing::debug;

use crate::market::{DAY_AHEAD_PUBLICATION_HOUR, PriceGrid};
use crate::sim::types::StepContext;

use super::{Controller, export_allowed, saturation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Planned {
    Charge,
    Discharge,
    Idle,
}

/// Plans against the prices the day-ahead market has published so far.
///
/// The plan is rebuilt at the first step, at every new day and once a day
/// at the publication hour, each time from the visible window only. Steps
/// priced well above the window mean discharge; steps well below it charge.
#[derive(Debug, Clone)]
pub struct DayAheadPolicy {
    pub discharge_threshold: f64,
    pub charge_threshold: f64,
    pub control_exflow: u8,
    plan: Vec<Planned>,
    plan_start: usize,
    known_avg: f64,
    last_plan: Option<NaiveDate>,
    last_publication: Option<NaiveDate>,
}

impl DayAheadPolicy {
    pub fn new(discharge_threshold: f64, charge_threshold: f64, control_exflow: u8) -> Self {
        Self {
            discharge_threshold,
            charge_threshold,
            control_exflow,
            plan: Vec::new(),
            plan_start: 0,
            known_avg: 0.0,
            last_plan: None,
            last_publication: None,
        }
    }

    /// Mean of the visible prices at the last replan (€/kWh).
    pub fn known_avg(&self) -> f64 {
        self.known_avg
    }

    fn replan(&mut self, index: usize, market: &PriceGrid) {
        let visible = market.visible_prices(index);
        self.known_avg = if visible.is_empty() {
            0.0
        } else {
            visible.iter().sum::<f64>() / visible.len() as f64
        };
        let high = self.discharge_threshold * self.known_avg;
        let low = self.charge_threshold * self.known_avg;
        self.plan = visible
            .iter()
            .map(|&price| {
                if price >= high {
                    Planned::Discharge
                } else if price <= low {
                    Planned::Charge
                } else {
                    Planned::Idle
                }
            })
            .collect();
        self.plan_start = index;
        debug!(
            index,
            horizon = visible.len(),
            known_avg = self.known_avg,
            "day-ahead plan rebuilt"
        );
    }

    fn planned(&self, index: usize) -> Planned {
        index
            .checked_sub(self.plan_start)
            .and_then(|offset| self.plan.get(offset))
            .copied()
            .unwrap_or(Planned::Idle)
    }
}

impl Default for DayAheadPolicy {
    fn default() -> Self {
        Self::new(1.2, 0.8, 3)
    }
}

impl Controller for DayAheadPolicy {
    fn observe(&mut self, ctx: &StepContext, market: &PriceGrid) {
        let date = ctx.timestamp.date();
        let published = ctx.timestamp.hour() >= DAY_AHEAD_PUBLICATION_HOUR
            && self.last_publication != Some(date);
        if published {
            self.last_publication = Some(date);
        }
        if published || self.last_plan != Some(date) {
            self.last_plan = Some(date);
            self.replan(ctx.index, market);
        }
    }

    fn should_discharge(&self, ctx: &StepContext) -> bool {
        self.planned(ctx.index) == Planned::Discharge && ctx.storage_kwh > ctx.floor_kwh()
    }

    fn should_charge(&self, ctx: &StepContext) -> bool {
        self.planned(ctx.index) == Planned::Charge && ctx.storage_kwh < ctx.ceiling_kwh()
    }

    fn should_export(&self, ctx: &StepContext) -> bool {
        export_allowed(ctx.price, self.control_exflow)
    }

    /// Renewable surplus after local demand, limited by the charge room.
    fn charge_amount(&self, ctx: &StepContext) -> f64 {
        ctx.surplus_kwh().min(ctx.charge_room())
    }

    fn discharge_amount(&self, ctx: &StepContext) -> f64 {
        let factor = if self.known_avg > 0.0 {
            let ratio = ctx.price / self.known_avg;
            let intensity = (ratio - self.discharge_threshold) / (2.0 - self.discharge_threshold);
            saturation(intensity)
        } else {
            1.0
        };
        factor * ctx.discharge_room()
    }
}
