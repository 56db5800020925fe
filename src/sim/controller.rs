//! Battery control policies.
//!
//! A policy answers four questions per step (discharge? charge? export?
//! how much?) from a read-only [`StepContext`]. Daily planning state is
//! refreshed through [`Controller::observe`], which the engine calls once
//! per step before any predicate.

pub mod day_ahead;
pub mod dynamic;
pub mod threshold;

pub use day_ahead::DayAheadPolicy;
pub use dynamic::DynamicDischargePolicy;
pub use threshold::ThresholdPolicy;

use crate::config::{PolicyConfig, PolicyKind};
use crate::market::PriceGrid;

use super::types::{Decision, StepContext};

/// Control contract between the engine and a policy.
pub trait Controller {
    /// Updates planning state from the market before the step is decided.
    fn observe(&mut self, _ctx: &StepContext, _market: &PriceGrid) {}

    fn should_discharge(&self, ctx: &StepContext) -> bool;

    fn should_charge(&self, ctx: &StepContext) -> bool;

    /// Whether surplus renewable energy may be sold this step.
    fn should_export(&self, ctx: &StepContext) -> bool;

    /// Energy offered to the battery when charging (kWh).
    fn charge_amount(&self, ctx: &StepContext) -> f64;

    /// Energy requested from the battery when discharging (kWh).
    fn discharge_amount(&self, ctx: &StepContext) -> f64;

    /// Resolves the predicates in priority order: discharge, charge,
    /// export, idle.
    fn decide(&self, ctx: &StepContext) -> Decision {
        if self.should_discharge(ctx) {
            Decision::Discharge(self.discharge_amount(ctx).max(0.0))
        } else if self.should_charge(ctx) {
            Decision::Charge(self.charge_amount(ctx).max(0.0))
        } else if self.should_export(ctx) {
            Decision::Export(ctx.surplus_kwh())
        } else {
            Decision::Idle
        }
    }
}

/// Export rule shared by the market-driven policies.
///
/// Selling is allowed at non-negative prices when the export control mode
/// is above 1.
pub fn export_allowed(price: f64, control_exflow: u8) -> bool {
    price >= 0.0 && control_exflow > 1
}

/// Concave saturation `1 - (1 - u)^3` for `u` clamped to `[0, 1]`.
pub fn saturation(u: f64) -> f64 {
    1.0 - (1.0 - u.clamp(0.0, 1.0)).powi(3)
}

/// Policy selected by configuration.
#[derive(Debug, Clone)]
pub enum Policy {
    Threshold(ThresholdPolicy),
    DynamicDischarge(DynamicDischargePolicy),
    DayAhead(DayAheadPolicy),
}

impl Policy {
    /// Builds a fresh policy with empty planning state.
    pub fn from_config(config: &PolicyConfig) -> Self {
        match config.kind {
            PolicyKind::Threshold => Self::Threshold(ThresholdPolicy::new(
                config.load_threshold,
                config.hysteresis,
            )),
            PolicyKind::DynamicDischarge => Self::DynamicDischarge(DynamicDischargePolicy::new(
                config.df_min,
                config.limit_soc_threshold,
                config.control_exflow,
            )),
            PolicyKind::DayAhead => Self::DayAhead(DayAheadPolicy::new(
                config.discharge_threshold,
                config.charge_threshold,
                config.control_exflow,
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Threshold(_) => "threshold",
            Self::DynamicDischarge(_) => "dynamic_discharge",
            Self::DayAhead(_) => "day_ahead",
        }
    }

    fn inner(&self) -> &dyn Controller {
        match self {
            Self::Threshold(p) => p,
            Self::DynamicDischarge(p) => p,
            Self::DayAhead(p) => p,
        }
    }
}

impl Controller for Policy {
    fn observe(&mut self, ctx: &StepContext, market: &PriceGrid) {
        match self {
            Self::Threshold(p) => p.observe(ctx, market),
            Self::DynamicDischarge(p) => p.observe(ctx, market),
            Self::DayAhead(p) => p.observe(ctx, market),
        }
    }

    fn should_discharge(&self, ctx: &StepContext) -> bool {
        self.inner().should_discharge(ctx)
    }

    fn should_charge(&self, ctx: &StepContext) -> bool {
        self.inner().should_charge(ctx)
    }

    fn should_export(&self, ctx: &StepContext) -> bool {
        self.inner().should_export(ctx)
    }

    fn charge_amount(&self, ctx: &StepContext) -> f64 {
        self.inner().charge_amount(ctx)
    }

    fn discharge_amount(&self, ctx: &StepContext) -> f64 {
        self.inner().discharge_amount(ctx)
    }
}
