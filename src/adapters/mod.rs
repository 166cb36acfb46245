//! Concrete adapter implementations for ports.

pub mod chart_svg;
pub mod csv_adapter;
pub mod csv_report_adapter;
pub mod file_config_adapter;
pub mod html_report_adapter;
pub mod tables;
#[cfg(feature = "web")]
pub mod web;

use crate::ports::report_port::ReportPort;
use std::path::Path;

/// Pick a report writer from the output extension: `.html`/`.htm` get HTML,
/// anything else CSV.
pub fn report_adapter_for(output_path: &str) -> Box<dyn ReportPort> {
    let ext = Path::new(output_path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("html") | Some("htm") => Box::new(html_report_adapter::HtmlReportAdapter::new()),
        _ => Box::new(csv_report_adapter::CsvReportAdapter::new()),
    }
}
