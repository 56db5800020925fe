//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level scenario configuration parsed from TOML.
///
/// All sections have defaults. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or start from one of the built-in
/// presets via [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Calendar, resolution and execution parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Synthetic generation/demand profile.
    #[serde(default)]
    pub profile: ProfileConfig,
    /// Physical battery parameters shared by every swept capacity.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Control policy selection and tuning.
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Prices, fees and premiums.
    #[serde(default)]
    pub market: MarketConfig,
    /// Capacities and baseline rows of the comparison table.
    #[serde(default)]
    pub sweep: SweepConfig,
}

/// Calendar, resolution and execution parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Calendar year of the simulated series; the price file must match it.
    pub year: i32,
    /// Number of days of synthetic data to generate (must be > 0).
    pub days: usize,
    /// Step length of synthetic data in minutes (must divide 60).
    pub resolution_minutes: u32,
    /// Master random seed for synthetic data.
    pub seed: u64,
    /// Run the capacity sweep on a thread pool.
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            year: 2024,
            days: 365,
            resolution_minutes: 60,
            seed: 42,
            parallel: true,
        }
    }
}

/// Kind of installation whose output is replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Application {
    /// Combined heat and power plant with constant output.
    Biogas,
    /// Solar park without local demand.
    Solar,
    /// Residential community with solar, wind and local demand.
    Community,
}

/// Synthetic generation/demand profile parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileConfig {
    /// Installation type.
    pub application: Application,
    /// Constant biogas output (kW).
    pub constant_biogas_kw: f64,
    /// Installed solar peak power (kW).
    pub solar_peak_kw: f64,
    /// Installed wind power (kW).
    pub wind_peak_kw: f64,
    /// Annual local demand (kWh); zero for pure producers.
    pub annual_demand_kwh: f64,
    /// AR(1) correlation of the cloud/wind factor (0.0-1.0).
    pub alpha: f64,
    /// AR(1) innovation noise standard deviation.
    pub noise_std: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            application: Application::Biogas,
            constant_biogas_kw: 1000.0,
            solar_peak_kw: 0.0,
            wind_peak_kw: 0.0,
            annual_demand_kwh: 0.0,
            alpha: 0.9,
            noise_std: 0.2,
        }
    }
}

/// Physical battery parameters.
///
/// Capacity and power come from the sweep; everything else is shared.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Lower SOC bound (0.0-1.0, exclusive).
    pub min_soc: f64,
    /// Upper SOC bound (0.0-1.0, exclusive).
    pub max_soc: f64,
    /// Charging efficiency (0.0-1.0].
    pub efficiency_charge: f64,
    /// Discharging efficiency (0.0-1.0].
    pub efficiency_discharge: f64,
    /// Self-discharge per hour as a fraction of stored energy.
    pub self_discharge_rate: f64,
    /// Internal resistance (Ω).
    pub internal_resistance_ohm: f64,
    /// Nominal voltage (V).
    pub nominal_voltage_v: f64,
    /// Default power ceiling as a multiple of capacity per hour.
    pub max_c_rate: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            min_soc: 0.05,
            max_soc: 0.95,
            efficiency_charge: 0.96,
            efficiency_discharge: 0.96,
            self_discharge_rate: 0.0005,
            internal_resistance_ohm: 0.006,
            nominal_voltage_v: 800.0,
            max_c_rate: 0.5,
        }
    }
}

impl BatteryConfig {
    /// Validates the physical parameters and returns a list of errors.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let open_unit = |v: f64| v > 0.0 && v < 1.0;
        if !open_unit(self.min_soc) {
            errors.push(ConfigError::new("battery.min_soc", "must be in (0.0, 1.0)"));
        }
        if !open_unit(self.max_soc) {
            errors.push(ConfigError::new("battery.max_soc", "must be in (0.0, 1.0)"));
        }
        if self.min_soc >= self.max_soc {
            errors.push(ConfigError::new("battery.min_soc", "must be < battery.max_soc"));
        }

        let efficiency = |v: f64| v > 0.0 && v <= 1.0;
        if !efficiency(self.efficiency_charge) {
            errors.push(ConfigError::new("battery.efficiency_charge", "must be in (0.0, 1.0]"));
        }
        if !efficiency(self.efficiency_discharge) {
            errors.push(ConfigError::new(
                "battery.efficiency_discharge",
                "must be in (0.0, 1.0]",
            ));
        }
        if self.self_discharge_rate.is_nan() || self.self_discharge_rate < 0.0 {
            errors.push(ConfigError::new("battery.self_discharge_rate", "must be >= 0"));
        }
        if self.internal_resistance_ohm.is_nan() || self.internal_resistance_ohm < 0.0 {
            errors.push(ConfigError::new("battery.internal_resistance_ohm", "must be >= 0"));
        }
        if self.nominal_voltage_v.is_nan() || self.nominal_voltage_v <= 0.0 {
            errors.push(ConfigError::new("battery.nominal_voltage_v", "must be > 0"));
        }
        if self.max_c_rate.is_nan() || self.max_c_rate <= 0.0 {
            errors.push(ConfigError::new("battery.max_c_rate", "must be > 0"));
        }

        errors
    }
}

/// Control policy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Rolling-average price threshold with optional hysteresis band.
    Threshold,
    /// Daily price ranking with a saturating discharge curve.
    DynamicDischarge,
    /// Decisions restricted to published day-ahead prices.
    DayAhead,
}

/// Control policy tuning. Each policy reads only the fields it needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    /// Which policy drives the battery.
    pub kind: PolicyKind,
    /// Threshold: multiple of the reference price separating charge from discharge.
    pub load_threshold: f64,
    /// Threshold: half-width of the dead band around `load_threshold`.
    pub hysteresis: f64,
    /// Dynamic discharge: minimum discharge factor that triggers discharging.
    pub df_min: f64,
    /// Dynamic discharge: SOC margin kept away from both bounds.
    pub limit_soc_threshold: f64,
    /// Day-ahead: discharge at or above this multiple of the known average.
    pub discharge_threshold: f64,
    /// Day-ahead: charge at or below this multiple of the known average.
    pub charge_threshold: f64,
    /// Export control mode; values above 1 allow exporting at non-negative prices.
    pub control_exflow: u8,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            kind: PolicyKind::Threshold,
            load_threshold: 1.0,
            hysteresis: 0.0,
            df_min: 0.7,
            limit_soc_threshold: 0.05,
            discharge_threshold: 1.2,
            charge_threshold: 0.8,
            control_exflow: 3,
        }
    }
}

/// Prices, fees and premiums.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarketConfig {
    /// Fixed supply contract price (ct/kWh).
    pub fix_price_ct_per_kwh: f64,
    /// Trading/brokerage offset added to every price (€/kWh, may be negative).
    pub marketing_cost_eur_per_kwh: f64,
    /// Use the fixed price instead of spot prices.
    pub fix_contract: bool,
    /// Annual flexibility premium credited to rows with a battery (€).
    pub flex_premium_eur: f64,
    /// Hourly spot price file; synthetic prices are used when absent.
    pub price_file: Option<PathBuf>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            fix_price_ct_per_kwh: 11.0,
            marketing_cost_eur_per_kwh: 0.0,
            fix_contract: false,
            flex_premium_eur: 0.0,
            price_file: None,
        }
    }
}

impl MarketConfig {
    /// Fixed contract price in €/kWh.
    pub fn fix_price_eur_per_kwh(&self) -> f64 {
        self.fix_price_ct_per_kwh / 100.0
    }
}

/// Reference rows placed ahead of the capacity rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Baseline {
    /// All demand bought from the grid, no generation.
    NoRenewable,
    /// Every kWh of generation exported at spot price.
    AlwaysExport,
    /// Full simulation without storage.
    NoBattery,
}

impl Baseline {
    /// Row label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::NoRenewable => "no renew",
            Self::AlwaysExport => "always",
            Self::NoBattery => "no bat",
        }
    }
}

/// Capacities and baseline rows of the comparison table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Battery capacities (MWh), ascending.
    pub capacities_mwh: Vec<f64>,
    /// Power ceilings (MW), one per capacity; derived from the C-rate when absent.
    pub powers_mw: Option<Vec<f64>>,
    /// Baseline rows, in table order.
    pub baselines: Vec<Baseline>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            capacities_mwh: vec![1.0, 5.0, 10.0, 20.0],
            powers_mw: None,
            baselines: vec![Baseline::AlwaysExport, Baseline::NoBattery],
        }
    }
}

impl SweepConfig {
    /// Returns `(capacity_kwh, p_max_kw)` for every swept capacity.
    pub fn entries(&self, max_c_rate: f64) -> Vec<(f64, f64)> {
        self.capacities_mwh
            .iter()
            .enumerate()
            .map(|(i, &capacity_mwh)| {
                let power_mw = self
                    .powers_mw
                    .as_ref()
                    .and_then(|powers| powers.get(i).copied())
                    .unwrap_or(capacity_mwh * max_c_rate);
                (capacity_mwh * 1000.0, power_mw * 1000.0)
            })
            .collect()
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, thiserror::Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.min_soc"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Biogas CHP with constant output, price-threshold trading and flex premium.
    pub fn biogas() -> Self {
        let constant_biogas_kw = 1000.0;
        Self {
            simulation: SimulationConfig::default(),
            profile: ProfileConfig {
                application: Application::Biogas,
                constant_biogas_kw,
                ..ProfileConfig::default()
            },
            battery: BatteryConfig::default(),
            policy: PolicyConfig {
                kind: PolicyKind::Threshold,
                control_exflow: 0,
                ..PolicyConfig::default()
            },
            market: MarketConfig {
                marketing_cost_eur_per_kwh: -0.003,
                flex_premium_eur: constant_biogas_kw * 100.0,
                ..MarketConfig::default()
            },
            sweep: SweepConfig {
                capacities_mwh: vec![1.0, 5.0, 10.0, 20.0, 100.0],
                powers_mw: Some(vec![0.5, 2.5, 5.0, 10.0, 50.0]),
                baselines: vec![Baseline::AlwaysExport, Baseline::NoBattery],
            },
        }
    }

    /// Solar park selling at spot with the dynamic discharge policy.
    pub fn solar() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            profile: ProfileConfig {
                application: Application::Solar,
                constant_biogas_kw: 0.0,
                solar_peak_kw: 10_000.0,
                ..ProfileConfig::default()
            },
            battery: BatteryConfig::default(),
            policy: PolicyConfig {
                kind: PolicyKind::DynamicDischarge,
                ..PolicyConfig::default()
            },
            market: MarketConfig {
                marketing_cost_eur_per_kwh: -0.003,
                ..MarketConfig::default()
            },
            sweep: SweepConfig {
                capacities_mwh: vec![1.0, 5.0, 10.0, 20.0, 50.0, 70.0],
                powers_mw: Some(vec![0.5, 2.5, 5.0, 10.0, 25.0, 35.0]),
                baselines: vec![Baseline::AlwaysExport, Baseline::NoBattery],
            },
        }
    }

    /// Solar park restricted to published day-ahead prices.
    pub fn solar_day_ahead() -> Self {
        let mut cfg = Self::solar();
        cfg.policy.kind = PolicyKind::DayAhead;
        cfg
    }

    /// Residential community with solar, wind and local demand.
    pub fn community() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            profile: ProfileConfig {
                application: Application::Community,
                constant_biogas_kw: 0.0,
                solar_peak_kw: 5000.0,
                wind_peak_kw: 5000.0,
                annual_demand_kwh: 2804.0 * 1000.0 * 6.0,
                ..ProfileConfig::default()
            },
            battery: BatteryConfig::default(),
            policy: PolicyConfig {
                kind: PolicyKind::DynamicDischarge,
                ..PolicyConfig::default()
            },
            market: MarketConfig {
                marketing_cost_eur_per_kwh: 0.003,
                ..MarketConfig::default()
            },
            sweep: SweepConfig {
                capacities_mwh: vec![0.1, 1.0, 5.0, 10.0, 20.0],
                powers_mw: Some(vec![0.05, 0.5, 2.5, 5.0, 10.0]),
                baselines: vec![Baseline::NoRenewable, Baseline::NoBattery],
            },
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["biogas", "solar", "solar_day_ahead", "community"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "biogas" => Ok(Self::biogas()),
            "solar" => Ok(Self::solar()),
            "solar_day_ahead" => Ok(Self::solar_day_ahead()),
            "community" => Ok(Self::community()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.simulation;
        if s.days == 0 {
            errors.push(ConfigError::new("simulation.days", "must be > 0"));
        }
        if s.resolution_minutes == 0 || 60 % s.resolution_minutes != 0 {
            errors.push(ConfigError::new(
                "simulation.resolution_minutes",
                "must be a divisor of 60",
            ));
        }

        let prof = &self.profile;
        if prof.constant_biogas_kw < 0.0 || prof.solar_peak_kw < 0.0 || prof.wind_peak_kw < 0.0 {
            errors.push(ConfigError::new("profile", "installed powers must be >= 0"));
        }
        if prof.annual_demand_kwh < 0.0 {
            errors.push(ConfigError::new("profile.annual_demand_kwh", "must be >= 0"));
        }
        if !(0.0..=1.0).contains(&prof.alpha) {
            errors.push(ConfigError::new("profile.alpha", "must be in [0.0, 1.0]"));
        }

        errors.extend(self.battery.validate());

        let p = &self.policy;
        if p.hysteresis < 0.0 {
            errors.push(ConfigError::new("policy.hysteresis", "must be >= 0"));
        }
        if p.hysteresis >= p.load_threshold {
            errors.push(ConfigError::new(
                "policy.hysteresis",
                "must be < policy.load_threshold",
            ));
        }
        if !(0.0..1.0).contains(&p.df_min) {
            errors.push(ConfigError::new("policy.df_min", "must be in [0.0, 1.0)"));
        }
        if !(0.0..0.5).contains(&p.limit_soc_threshold) {
            errors.push(ConfigError::new(
                "policy.limit_soc_threshold",
                "must be in [0.0, 0.5)",
            ));
        }
        if p.charge_threshold >= p.discharge_threshold {
            errors.push(ConfigError::new(
                "policy.charge_threshold",
                "must be < policy.discharge_threshold",
            ));
        }
        if p.discharge_threshold >= 2.0 {
            errors.push(ConfigError::new("policy.discharge_threshold", "must be < 2.0"));
        }

        if self.market.fix_price_ct_per_kwh < 0.0 {
            errors.push(ConfigError::new("market.fix_price_ct_per_kwh", "must be >= 0"));
        }

        let sw = &self.sweep;
        if sw.capacities_mwh.iter().any(|c| c.is_nan() || *c < 0.0) {
            errors.push(ConfigError::new("sweep.capacities_mwh", "must be >= 0"));
        }
        if sw.capacities_mwh.windows(2).any(|w| w[0] > w[1]) {
            errors.push(ConfigError::new("sweep.capacities_mwh", "must be ascending"));
        }
        if let Some(powers) = &sw.powers_mw {
            if powers.len() != sw.capacities_mwh.len() {
                errors.push(ConfigError::new(
                    "sweep.powers_mw",
                    "must have one entry per capacity",
                ));
            }
            let zero_power_with_capacity = powers
                .iter()
                .zip(&sw.capacities_mwh)
                .any(|(p, c)| *c > 0.0 && *p <= 0.0);
            if zero_power_with_capacity {
                errors.push(ConfigError::new(
                    "sweep.powers_mw",
                    "must be > 0 for non-zero capacities",
                ));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scenario_is_valid() {
        let errors = ScenarioConfig::default().validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn community_preset_compares_against_grid_supply() {
        let cfg = ScenarioConfig::community();
        assert_eq!(cfg.sweep.baselines[0], Baseline::NoRenewable);
        assert!(cfg.profile.annual_demand_kwh > 0.0);
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
year = 2023
days = 30
resolution_minutes = 15
seed = 7
parallel = false

[profile]
application = "solar"
solar_peak_kw = 2500.0

[battery]
min_soc = 0.1
max_soc = 0.9
max_c_rate = 1.0

[policy]
kind = "day_ahead"
discharge_threshold = 1.3
charge_threshold = 0.7

[market]
fix_price_ct_per_kwh = 12.5
marketing_cost_eur_per_kwh = -0.002

[sweep]
capacities_mwh = [0.0, 1.0, 2.0]
baselines = ["always_export", "no_battery"]
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.year), Some(2023));
        assert_eq!(cfg.as_ref().map(|c| c.profile.application), Some(Application::Solar));
        assert_eq!(cfg.as_ref().map(|c| c.policy.kind), Some(PolicyKind::DayAhead));
        assert_eq!(cfg.as_ref().map(|c| c.sweep.capacities_mwh.len()), Some(3));
        assert!(cfg.map(|c| c.validate().is_empty()).unwrap_or(false));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[battery]
min_soc = 0.1
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn unknown_policy_kind_is_rejected() {
        let toml = r#"
[policy]
kind = "mpc"
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
seed = 99
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.seed), Some(99));
        assert_eq!(cfg.as_ref().map(|c| c.simulation.resolution_minutes), Some(60));
        assert_eq!(cfg.as_ref().map(|c| c.battery.max_soc), Some(0.95));
    }

    #[test]
    fn validation_catches_inverted_soc_window() {
        let mut cfg = ScenarioConfig::default();
        cfg.battery.min_soc = 0.8;
        cfg.battery.max_soc = 0.3;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.min_soc"));
    }

    #[test]
    fn validation_catches_bad_resolution() {
        let mut cfg = ScenarioConfig::default();
        cfg.simulation.resolution_minutes = 7;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.resolution_minutes"));
    }

    #[test]
    fn validation_catches_unsorted_sweep() {
        let mut cfg = ScenarioConfig::default();
        cfg.sweep.capacities_mwh = vec![5.0, 1.0];
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "sweep.capacities_mwh"));
    }

    #[test]
    fn validation_catches_power_list_mismatch() {
        let mut cfg = ScenarioConfig::default();
        cfg.sweep.powers_mw = Some(vec![1.0]);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "sweep.powers_mw"));
    }

    #[test]
    fn sweep_entries_fall_back_to_c_rate() {
        let sweep = SweepConfig {
            capacities_mwh: vec![0.0, 2.0],
            powers_mw: None,
            baselines: Vec::new(),
        };
        assert_eq!(sweep.entries(0.5), vec![(0.0, 0.0), (2000.0, 1000.0)]);
    }
}
