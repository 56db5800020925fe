//! Prices resampled onto the simulation grid.

use std::ops::Range;

use chrono::{NaiveDateTime, TimeDelta, Timelike};

use crate::market::prices::PriceSeries;
use crate::series::EnergySeries;

/// Hour at which the day-ahead auction result for the next day is published.
pub const DAY_AHEAD_PUBLICATION_HOUR: u32 = 13;

/// Per-step spot and reference prices aligned to an [`EnergySeries`].
///
/// Both columns include the marketing-cost offset. The grid is shared
/// read-only by all runs of a sweep.
#[derive(Debug, Clone)]
pub struct PriceGrid {
    start: NaiveDateTime,
    step: TimeDelta,
    price: Vec<f64>,
    reference: Vec<f64>,
    marketing_cost: f64,
}

impl PriceGrid {
    /// Aligns hourly prices to the series by whole-hour offset.
    ///
    /// Step `i` takes the price of hour `floor((t_i - t_0) / 1 h)` counted
    /// from the first price sample, clamped into the price series.
    pub fn align(series: &EnergySeries, prices: &PriceSeries, marketing_cost: f64) -> Self {
        let rolling = prices.rolling_mean();
        let last = prices.len().saturating_sub(1);
        let (price, reference): (Vec<f64>, Vec<f64>) = (0..series.len())
            .map(|i| {
                let minutes = (series.timestamp(i) - prices.start()).num_minutes();
                let hour = usize::try_from(minutes.div_euclid(60)).unwrap_or(0).min(last);
                (
                    prices.prices()[hour] + marketing_cost,
                    rolling[hour] + marketing_cost,
                )
            })
            .unzip();

        Self {
            start: series.start(),
            step: series.step(),
            price,
            reference,
            marketing_cost,
        }
    }

    /// A flat contract price on every step: price and reference coincide.
    pub fn fixed(series: &EnergySeries, fix_price: f64, marketing_cost: f64) -> Self {
        let value = fix_price + marketing_cost;
        Self {
            start: series.start(),
            step: series.step(),
            price: vec![value; series.len()],
            reference: vec![value; series.len()],
            marketing_cost,
        }
    }

    pub fn len(&self) -> usize {
        self.price.len()
    }

    pub fn is_empty(&self) -> bool {
        self.price.is_empty()
    }

    /// Spot price at step `index` (€/kWh).
    pub fn price(&self, index: usize) -> f64 {
        self.price[index]
    }

    /// Reference (rolling mean) price at step `index` (€/kWh).
    pub fn reference(&self, index: usize) -> f64 {
        self.reference[index]
    }

    pub fn prices(&self) -> &[f64] {
        &self.price
    }

    pub fn references(&self) -> &[f64] {
        &self.reference
    }

    /// Offset added to every price (€/kWh).
    pub fn marketing_cost(&self) -> f64 {
        self.marketing_cost
    }

    pub fn timestamp(&self, index: usize) -> NaiveDateTime {
        let offset = i32::try_from(index).unwrap_or(i32::MAX);
        self.start + self.step * offset
    }

    /// End (exclusive) of the prices known to the market at `now`.
    ///
    /// Before the publication hour only the current day is known; from then
    /// on the next day is known as well.
    pub fn published_until(now: NaiveDateTime) -> NaiveDateTime {
        let days_ahead = if now.hour() >= DAY_AHEAD_PUBLICATION_HOUR {
            2
        } else {
            1
        };
        let midnight = now.date().and_time(chrono::NaiveTime::MIN);
        midnight + TimeDelta::days(days_ahead)
    }

    /// Step indices from `index` up to the end of the published horizon.
    pub fn visible_range(&self, index: usize) -> Range<usize> {
        let horizon = Self::published_until(self.timestamp(index));
        let seconds = (horizon - self.start).num_seconds();
        let step = self.step.num_seconds().max(1);
        let end = usize::try_from((seconds + step - 1) / step).unwrap_or(0);
        index..end.clamp(index, self.len())
    }

    /// Prices a forecaster may see at step `index`, starting at that step.
    pub fn visible_prices(&self, index: usize) -> &[f64] {
        &self.price[self.visible_range(index)]
    }
}
