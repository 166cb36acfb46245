//! CSV report adapter implementing ReportPort.
//!
//! Writes the lookback and forward tables as one CSV with a `Section`
//! column, followed by an `overall` row holding the summary averages.

use std::fs;
use std::path::Path;

use crate::domain::error::SlotwalkError;
use crate::domain::slot_stats::SlotStats;
use crate::ports::report_port::{ReportContext, ReportPort};

pub const HEADER: [&str; 7] = ["Section", "Day", "Time", "PnL", "PCR", "Trades", "TotalPnL"];

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn csv_err(e: csv::Error) -> SlotwalkError {
    SlotwalkError::Report {
        reason: format!("CSV write error: {e}"),
    }
}

fn opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_rows<W: std::io::Write>(
    wtr: &mut csv::Writer<W>,
    section: &str,
    rows: &[SlotStats],
) -> Result<(), SlotwalkError> {
    for row in rows {
        wtr.write_record([
            section.to_string(),
            row.slot.day_label(),
            row.slot.time_label(),
            row.pnl.to_string(),
            opt(row.pcr),
            row.trades.to_string(),
            row.total_pnl.to_string(),
        ])
        .map_err(csv_err)?;
    }
    Ok(())
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, ctx: &ReportContext<'_>, output_path: &str) -> Result<(), SlotwalkError> {
        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut wtr = csv::Writer::from_path(path).map_err(csv_err)?;
        wtr.write_record(HEADER).map_err(csv_err)?;
        write_rows(&mut wtr, "lookback", &ctx.result.lookback)?;
        write_rows(&mut wtr, "forward", &ctx.result.forward)?;

        let overall = &ctx.result.overall;
        wtr.write_record([
            "overall".to_string(),
            String::new(),
            String::new(),
            opt(overall.avg_pnl),
            opt(overall.avg_pcr),
            overall.trades.to_string(),
            overall.total_pnl.to_string(),
        ])
        .map_err(csv_err)?;
        wtr.flush()?;
        Ok(())
    }
}
