//! Table formatting shared by the console, HTML and web outputs.
//!
//! Provides:
//! - display rows for slot tables ([`SlotRow`])
//! - a fixed-width text table for the terminal
//! - [`ResultsView`], the pre-formatted model the HTML templates render

use crate::adapters::chart_svg::generate_slot_bar_svg;
use crate::domain::folds::{FoldResult, FoldSummary};
use crate::domain::slot_stats::SlotStats;
use crate::domain::walk_forward::WalkForwardResult;

/// One slot table row formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotRow {
    pub day: String,
    pub time: String,
    pub pnl: String,
    pub pcr: String,
    pub trades: usize,
    pub total_pnl: String,
    pub negative: bool,
}

impl SlotRow {
    pub fn from_stats(stats: &SlotStats) -> Self {
        Self {
            day: stats.slot.day_label(),
            time: stats.slot.time_label(),
            pnl: format!("{:.2}", stats.pnl),
            pcr: format_opt(stats.pcr),
            trades: stats.trades,
            total_pnl: format!("{:.2}", stats.total_pnl),
            negative: stats.pnl < 0.0,
        }
    }
}

pub fn slot_rows(stats: &[SlotStats]) -> Vec<SlotRow> {
    stats.iter().map(SlotRow::from_stats).collect()
}

/// Two decimals, or "n/a" when there is no value.
pub fn format_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}

const HEADERS: [&str; 6] = ["Day", "Time", "PnL", "PCR", "Trades", "Total PnL"];

/// Fixed-width text table for terminal output.
pub fn format_text_table(rows: &[SlotStats]) -> String {
    if rows.is_empty() {
        return "  (no matching slots)\n".to_string();
    }

    let cells: Vec<[String; 6]> = slot_rows(rows)
        .into_iter()
        .map(|r| [r.day, r.time, r.pnl, r.pcr, r.trades.to_string(), r.total_pnl])
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths.iter())
        .enumerate()
        .map(|(i, (h, w))| pad(h, *w, i >= 2))
        .collect();
    out.push_str(&format!("  {}\n", header.join("  ")));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("  {}\n", rule.join("  ")));

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(widths.iter())
            .enumerate()
            .map(|(i, (c, w))| pad(c, *w, i >= 2))
            .collect();
        out.push_str(&format!("  {}\n", line.join("  ")));
    }
    out
}

fn pad(text: &str, width: usize, right_align: bool) -> String {
    if right_align {
        format!("{text:>width$}")
    } else {
        format!("{text:<width$}")
    }
}

/// Everything the results templates display for one walk-forward run.
pub struct ResultsView {
    pub source: String,
    pub lookback_period: String,
    pub forward_period: String,
    pub optimize_for: String,
    pub top_n: usize,
    pub lookback_rows: Vec<SlotRow>,
    pub forward_rows: Vec<SlotRow>,
    pub avg_pnl: String,
    pub avg_pcr: String,
    pub forward_slots: usize,
    pub forward_trades: usize,
    pub total_pnl: String,
    pub lookback_chart: String,
    pub forward_chart: String,
}

impl ResultsView {
    pub fn new(source: &str, result: &WalkForwardResult) -> Self {
        let metric = result.params.optimize_for;
        Self {
            source: source.to_string(),
            lookback_period: result.params.lookback.to_string(),
            forward_period: result.params.forward.to_string(),
            optimize_for: metric.label().to_string(),
            top_n: result.params.top_n,
            lookback_rows: slot_rows(&result.lookback),
            forward_rows: slot_rows(&result.forward),
            avg_pnl: format_opt(result.overall.avg_pnl),
            avg_pcr: format_opt(result.overall.avg_pcr),
            forward_slots: result.overall.slots,
            forward_trades: result.overall.trades,
            total_pnl: format!("{:.2}", result.overall.total_pnl),
            lookback_chart: generate_slot_bar_svg(&result.lookback, metric),
            forward_chart: generate_slot_bar_svg(&result.forward, metric),
        }
    }
}

/// One line of the rolling walk-forward table.
pub fn format_fold_line(fold: &FoldResult) -> String {
    let r = &fold.result;
    format!(
        "  #{:<3} {}  |  {}  |  {} slots, avg PnL {}, avg PCR {}",
        fold.index + 1,
        r.params.lookback,
        r.params.forward,
        r.overall.slots,
        format_opt(r.overall.avg_pnl),
        format_opt(r.overall.avg_pcr),
    )
}

pub fn format_fold_summary(summary: &FoldSummary) -> String {
    format!(
        "Folds: {} ({} evaluated, {} profitable)\nMean forward PnL: {}\nMean forward PCR: {}",
        summary.folds,
        summary.evaluated,
        summary.profitable,
        format_opt(summary.mean_avg_pnl),
        format_opt(summary.mean_avg_pcr),
    )
}
