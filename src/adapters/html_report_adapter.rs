//! HTML report adapter implementing ReportPort.
//!
//! Renders a standalone page with the lookback table, forward table and
//! overall summary, plus an inline SVG bar chart per table.

use std::fs;
use std::path::Path;

use askama::Template;

use crate::adapters::tables::ResultsView;
use crate::domain::error::SlotwalkError;
use crate::ports::report_port::{ReportContext, ReportPort};

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate {
    view: ResultsView,
    first_date: String,
    last_date: String,
    trade_count: usize,
}

pub struct HtmlReportAdapter;

impl HtmlReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, ctx: &ReportContext<'_>) -> Result<String, SlotwalkError> {
        let template = ReportTemplate {
            view: ResultsView::new(ctx.source, ctx.result),
            first_date: ctx.range.first.to_string(),
            last_date: ctx.range.last.to_string(),
            trade_count: ctx.range.trades,
        };
        template.render().map_err(|e| SlotwalkError::Report {
            reason: e.to_string(),
        })
    }
}

impl Default for HtmlReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for HtmlReportAdapter {
    fn write(&self, ctx: &ReportContext<'_>, output_path: &str) -> Result<(), SlotwalkError> {
        let html = self.render(ctx)?;

        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, html)?;
        Ok(())
    }
}
