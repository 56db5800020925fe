//! Battery storage simulator entry point: CLI wiring and sweep execution.

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bess_sim::analytics::BatteryAnalytics;
use bess_sim::config::ScenarioConfig;
use bess_sim::devices::profile::synthetic_series;
use bess_sim::io::export::{export_steps_csv, export_table_csv};
use bess_sim::market::PriceSeries;
use bess_sim::reporting;
use bess_sim::series::EnergySeries;

use cli::Args;

/// Loads the scenario and applies command-line overrides.
fn load_scenario(args: &Args) -> Result<ScenarioConfig> {
    let mut scenario = match &args.scenario {
        Some(path) => ScenarioConfig::from_toml_file(path)?,
        None => ScenarioConfig::from_preset(args.preset_name())?,
    };
    if let Some(seed) = args.seed {
        scenario.simulation.seed = seed;
    }
    if let Some(days) = args.days {
        scenario.simulation.days = days;
    }
    if args.sequential {
        scenario.simulation.parallel = false;
    }
    if let Some(path) = &args.prices {
        scenario.market.price_file = Some(path.clone());
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("{e}");
        }
        bail!("scenario has {} invalid setting(s)", errors.len());
    }
    Ok(scenario)
}

fn load_prices(scenario: &ScenarioConfig) -> Result<Option<PriceSeries>> {
    if scenario.market.fix_contract {
        return Ok(None);
    }
    let year = scenario.simulation.year;
    let prices = match &scenario.market.price_file {
        Some(path) => PriceSeries::from_path(path, year)
            .with_context(|| format!("failed to load prices from {}", path.display()))?,
        None => {
            info!(year, "no price file given, using synthetic spot prices");
            PriceSeries::synthetic(year, scenario.simulation.seed)?
        }
    };
    Ok(Some(prices))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let scenario = load_scenario(&args)?;

    let series = match &args.series {
        Some(path) => EnergySeries::from_path(path)
            .with_context(|| format!("failed to load series from {}", path.display()))?,
        None => synthetic_series(&scenario.simulation, &scenario.profile)?,
    };
    info!(
        application = ?scenario.profile.application,
        steps = series.len(),
        renew_kwh = series.total_renew_kwh(),
        demand_kwh = series.total_demand_kwh(),
        "energy series ready"
    );

    let prices = load_prices(&scenario)?;
    let analytics = BatteryAnalytics::new(scenario, series, prices.as_ref())?;
    let table = analytics.run()?;

    println!(
        "{}",
        reporting::render(&table, analytics.series().total_renew_kwh())
    );

    if let Some(path) = &args.table_out {
        export_table_csv(&table, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "comparison table written");
    }

    if let Some(path) = &args.telemetry_out {
        let capacity_kwh = args.telemetry_capacity_mwh * 1000.0;
        let records = analytics.simulate(capacity_kwh, analytics.power_for(capacity_kwh))?;
        export_steps_csv(&records, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), capacity_kwh, "telemetry written");
    }

    Ok(())
}
