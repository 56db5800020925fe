//! CSV export for step records and sweep metrics.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::analytics::ScenarioTable;
use crate::sim::types::StepRecord;

/// Column header for step telemetry export.
const STEP_HEADER: &str = "index,timestamp,decision,renew_kwh,demand_kwh,\
                           absorbed_kwh,delivered_kwh,export_kwh,residual_kwh,\
                           curtailed_kwh,loss_kwh,self_discharge_kwh,\
                           storage_kwh,soc,price_eur_per_kwh,exported";

/// Column header for the sweep table export.
const TABLE_HEADER: &str = "label,capacity_kwh,power_kw,residual_kwh,export_kwh,\
                            export_hours,curtailed_kwh,loss_kwh,self_discharge_kwh,\
                            equivalent_cycles,autarky,spot_cost_eur,fix_cost_eur,\
                            revenue_eur,spot_profit_eur,fix_profit_eur,\
                            revenue_gain_eur,gain_eur_per_kwh,\
                            spot_saving_eur_per_kwh,fix_saving_eur_per_kwh";

/// Exports step records to a CSV file at the given path.
///
/// Writes a header row followed by one data row per step. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_steps_csv(records: &[StepRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_steps_csv(records, io::BufWriter::new(file))
}

/// Writes step records as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_steps_csv(records: &[StepRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(STEP_HEADER.split(',').map(str::trim))?;

    for r in records {
        wtr.write_record(&[
            r.index.to_string(),
            r.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            r.decision.label().to_string(),
            format!("{:.4}", r.renew_kwh),
            format!("{:.4}", r.demand_kwh),
            format!("{:.4}", r.absorbed_kwh),
            format!("{:.4}", r.delivered_kwh),
            format!("{:.4}", r.export_kwh),
            format!("{:.4}", r.residual_kwh),
            format!("{:.4}", r.curtailed_kwh),
            format!("{:.4}", r.loss_kwh),
            format!("{:.4}", r.self_discharge_kwh),
            format!("{:.4}", r.storage_kwh),
            format!("{:.4}", r.soc),
            format!("{:.5}", r.price),
            r.exported.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the sweep table to a CSV file, one line per row.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_table_csv(table: &ScenarioTable, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_table_csv(table, io::BufWriter::new(file))
}

/// Writes the sweep table as CSV to any writer.
///
/// Comparison columns without a value are left empty.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_table_csv(table: &ScenarioTable, writer: impl Write) -> io::Result<()> {
    let optional = |value: Option<f64>| value.map_or_else(String::new, |v| format!("{v:.4}"));
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(TABLE_HEADER.split(',').map(str::trim))?;

    for m in &table.rows {
        wtr.write_record(&[
            m.label.clone(),
            format!("{:.1}", m.capacity_kwh),
            format!("{:.1}", m.power_kw),
            format!("{:.3}", m.residual_kwh),
            format!("{:.3}", m.export_kwh),
            format!("{:.2}", m.export_hours),
            format!("{:.3}", m.curtailed_kwh),
            format!("{:.3}", m.loss_kwh),
            format!("{:.3}", m.self_discharge_kwh),
            format!("{:.3}", m.equivalent_cycles),
            format!("{:.4}", m.autarky),
            format!("{:.2}", m.spot_cost_eur),
            format!("{:.2}", m.fix_cost_eur),
            format!("{:.2}", m.revenue_eur),
            format!("{:.2}", m.spot_profit_eur()),
            format!("{:.2}", m.fix_profit_eur()),
            optional(m.revenue_gain_eur),
            optional(m.gain_eur_per_kwh),
            optional(m.spot_saving_eur_per_kwh),
            optional(m.fix_saving_eur_per_kwh),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
