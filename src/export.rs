//! CSV export of projections and a plain-text summary report

use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::ExportError;
use crate::simulation::{PeriodSnapshot, SimulationResult};

/// Column order of the projection CSV
pub const PROJECTION_CSV_HEADER: [&str; 5] =
    ["Month", "Total Shares", "Shares Bought", "Dividends", "Reinvested"];

/// One CSV record. `f64`'s `Display` never switches to exponent notation,
/// so long runs with very large share counts still print as plain decimals.
fn csv_record(s: &PeriodSnapshot) -> [String; 5] {
    [
        s.month.to_string(),
        s.total_shares.to_string(),
        s.shares_bought.to_string(),
        s.gross_dividends.to_string(),
        s.reinvested_cash.to_string(),
    ]
}

/// Write one CSV row per snapshot, header first
pub fn write_projection_csv<W: Write>(snapshots: &[PeriodSnapshot], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    csv_writer.write_record(PROJECTION_CSV_HEADER)?;
    for snapshot in snapshots {
        csv_writer.write_record(csv_record(snapshot))?;
    }
    csv_writer.flush()?;

    Ok(())
}

/// Write the projection CSV to a file
pub fn write_projection_csv_file<P: AsRef<Path>>(
    snapshots: &[PeriodSnapshot],
    path: P,
) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_projection_csv(snapshots, file)
}

/// Render the projection CSV into a string
pub fn projection_csv_string(snapshots: &[PeriodSnapshot]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_projection_csv(snapshots, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Short text summary of a run, one fact per line
pub fn render_report(title: &str, result: &SimulationResult) -> String {
    let summary = result.summary();
    // Whole shares only, truncated toward zero
    let final_shares = summary.final_shares.trunc() as i64;

    let mut report = String::new();
    report.push_str(title);
    report.push('\n');
    report.push_str(&format!("Final Shares: {}\n", final_shares));
    report.push_str(&format!("Months Simulated: {}\n", summary.total_months));
    report.push_str(&format!("Total Dividends: ${:.2}\n", summary.total_gross_dividends));
    report.push_str(&format!("Total Reinvested: ${:.2}\n", summary.total_reinvested));
    report
}
