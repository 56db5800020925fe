use chrono::{NaiveDate, Timelike};
use tracing::trace;

use crate::market::{DAY_AHEAD_PUBLICATION_HOUR, PriceGrid};
use crate::sim::types::StepContext;

use super::{Controller, export_allowed, saturation};

/// Rank given to hours without a price sample.
const UNRANKED: f64 = 12.0;
/// Rank spread below which all factors collapse to zero.
const MIN_SPREAD: f64 = 0.001;

/// Discharges into the most expensive hours of the coming day.
///
/// Once at the start of a run and then once a day at the publication hour,
/// the next 24 hours of visible prices are ranked per hour of day and
/// normalised to a discharge factor in `[-1, 1]` (cheapest to dearest).
/// Negative factors charge from surplus; factors above `df_min` discharge
/// with a saturating intensity.
#[derive(Debug, Clone)]
pub struct DynamicDischargePolicy {
    pub df_min: f64,
    pub limit_soc_threshold: f64,
    pub control_exflow: u8,
    factors: Option<[f64; 24]>,
    last_update: Option<NaiveDate>,
}

impl DynamicDischargePolicy {
    pub fn new(df_min: f64, limit_soc_threshold: f64, control_exflow: u8) -> Self {
        Self {
            df_min,
            limit_soc_threshold,
            control_exflow,
            factors: None,
            last_update: None,
        }
    }

    /// Discharge factor for the hour of `ctx`; zero before the first ranking.
    fn factor(&self, ctx: &StepContext) -> f64 {
        self.factors
            .map_or(0.0, |f| f[ctx.timestamp.hour() as usize % 24])
    }

    fn rank(&mut self, index: usize, market: &PriceGrid) {
        let steps_per_day = (24.0 / market_resolution_h(market)).round().max(1.0) as usize;
        let range = market.visible_range(index);
        let end = range.end.min(index + steps_per_day);
        let samples = (index..end).map(|i| (market.timestamp(i).hour(), market.price(i)));
        self.factors = Some(rank_hours(samples));
        trace!(index, factors = ?self.factors, "re-ranked daily prices");
    }
}

fn market_resolution_h(market: &PriceGrid) -> f64 {
    if market.len() < 2 {
        return 1.0;
    }
    let step = market.timestamp(1) - market.timestamp(0);
    (step.num_seconds() as f64 / 3600.0).max(f64::EPSILON)
}

/// Normalised price ranks per hour of day.
///
/// Only the first sample of each hour counts. Hours without a sample get the
/// middle rank. The ranks are scaled to `[-1, 1]`, or all zero when they
/// barely differ.
pub fn rank_hours(samples: impl IntoIterator<Item = (u32, f64)>) -> [f64; 24] {
    let mut seen = [false; 24];
    let mut firsts: Vec<(usize, f64)> = Vec::with_capacity(24);
    for (hour, price) in samples {
        let hour = hour as usize % 24;
        if !seen[hour] {
            seen[hour] = true;
            firsts.push((hour, price));
        }
    }
    if firsts.is_empty() {
        return [0.0; 24];
    }
    firsts.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut ranks = [UNRANKED; 24];
    for (rank, (hour, _)) in firsts.iter().enumerate() {
        ranks[*hour] = rank as f64;
    }
    let lo = ranks.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = ranks.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if hi - lo > MIN_SPREAD {
        ranks.map(|r| (r - lo) / (hi - lo) * 2.0 - 1.0)
    } else {
        [0.0; 24]
    }
}

impl Controller for DynamicDischargePolicy {
    fn observe(&mut self, ctx: &StepContext, market: &PriceGrid) {
        let date = ctx.timestamp.date();
        let published = ctx.timestamp.hour() >= DAY_AHEAD_PUBLICATION_HOUR
            && self.last_update != Some(date);
        if self.factors.is_none() || published {
            self.rank(ctx.index, market);
            if published {
                self.last_update = Some(date);
            }
        }
    }

    fn should_discharge(&self, ctx: &StepContext) -> bool {
        self.factor(ctx) > self.df_min
            && ctx.storage_kwh >= (ctx.min_soc + self.limit_soc_threshold) * ctx.capacity_kwh
    }

    fn should_charge(&self, ctx: &StepContext) -> bool {
        self.factor(ctx) < 0.0
            && ctx.storage_kwh <= (ctx.max_soc - self.limit_soc_threshold) * ctx.capacity_kwh
    }

    fn should_export(&self, ctx: &StepContext) -> bool {
        export_allowed(ctx.price, self.control_exflow)
    }

    fn charge_amount(&self, ctx: &StepContext) -> f64 {
        ctx.surplus_kwh().min(ctx.charge_room())
    }

    /// Saturating share of the discharge room; in communities capped at the
    /// local deficit.
    fn discharge_amount(&self, ctx: &StepContext) -> f64 {
        let u = (self.factor(ctx) - self.df_min) / (1.0 - self.df_min);
        let amount = saturation(u) * ctx.discharge_room();
        if ctx.demand_kwh.abs() > 0.0 {
            let deficit = (ctx.demand_kwh.abs() - ctx.renew_kwh).max(0.0);
            amount.min(deficit)
        } else {
            amount
        }
    }
}
