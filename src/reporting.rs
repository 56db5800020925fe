//! Terminal rendering of the capacity comparison table.

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, presets::UTF8_FULL};

use crate::analytics::ScenarioTable;
use crate::sim::kpi::ScenarioMetrics;

/// Units the table is printed in.
///
/// Installations above 1 GWh of annual energy are shown in MWh and T€.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub divisor: f64,
    pub energy_unit: &'static str,
    pub money_unit: &'static str,
}

impl Scale {
    pub fn for_energy(total_kwh: f64) -> Self {
        if total_kwh.abs() / 1000.0 > 1000.0 {
            Self {
                divisor: 1000.0,
                energy_unit: "MWh",
                money_unit: "T€",
            }
        } else {
            Self {
                divisor: 1.0,
                energy_unit: "kWh",
                money_unit: "€",
            }
        }
    }

    fn energy(&self, kwh: f64) -> String {
        format!("{:.1}", kwh / self.divisor)
    }

    fn money(&self, eur: f64) -> String {
        format!("{:.1}", eur / self.divisor)
    }
}

fn bold(text: String) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn right(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn signed(value: Option<f64>, text: impl Fn(f64) -> String) -> Cell {
    match value {
        None => right("-".to_string()),
        Some(v) => right(text(v)).fg(if v > 0.0 {
            Color::Green
        } else if v < 0.0 {
            Color::Red
        } else {
            Color::Reset
        }),
    }
}

fn row(metrics: &ScenarioMetrics, scale: Scale, baseline: bool) -> Vec<Cell> {
    let name = if baseline {
        Cell::new(&metrics.label).add_attribute(Attribute::Dim)
    } else {
        right(format!("{}", metrics.capacity_kwh / scale.divisor))
    };
    let power = if metrics.has_battery() {
        right(format!("{}", metrics.power_kw / scale.divisor))
    } else {
        right("-".to_string())
    };
    vec![
        name,
        power,
        right(scale.energy(metrics.residual_kwh)),
        right(scale.energy(metrics.export_kwh)),
        right(format!("{:.0}", metrics.export_hours)),
        right(scale.energy(metrics.curtailed_kwh)),
        right(format!("{:.2}", metrics.autarky)),
        right(scale.money(metrics.spot_cost_eur)),
        right(scale.money(metrics.fix_cost_eur)),
        right(scale.money(metrics.revenue_eur)),
        signed(metrics.revenue_gain_eur, |v| scale.money(v)),
        signed(metrics.gain_eur_per_kwh, |v| format!("{v:.2}")),
    ]
}

/// Builds the comparison table, one line per row of `table`.
pub fn build_table(table: &ScenarioTable, scale: Scale) -> Table {
    let e = scale.energy_unit;
    let m = scale.money_unit;
    let power_unit = if scale.divisor > 1.0 { "MW" } else { "kW" };

    let mut out = Table::new();
    out.load_preset(UTF8_FULL);
    out.set_header(vec![
        bold(format!("cap {e}")),
        bold(format!("power {power_unit}")),
        bold(format!("resi {e}")),
        bold(format!("exfl {e}")),
        bold("export [h]".to_string()),
        bold(format!("curt {e}")),
        bold("autarky".to_string()),
        bold(format!("spp [{m}]")),
        bold(format!("fixp [{m}]")),
        bold(format!("rev [{m}]")),
        bold(format!("revadd [{m}]")),
        bold("rev €/kWh".to_string()),
    ]);
    for (i, metrics) in table.rows.iter().enumerate() {
        out.add_row(row(metrics, scale, i < table.baseline_rows));
    }
    out
}

/// Renders the table with a one-line summary underneath.
pub fn render(table: &ScenarioTable, total_renew_kwh: f64) -> String {
    let scale = Scale::for_energy(total_renew_kwh);
    let mut output = build_table(table, scale).to_string();
    output.push('\n');
    output.push_str(&format!(
        "Policy: {} | renewable {} {} | {} rows\n",
        table.policy,
        scale.energy(total_renew_kwh),
        scale.energy_unit,
        table.rows.len()
    ));
    output
}
