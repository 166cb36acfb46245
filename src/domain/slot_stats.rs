//! Per-slot aggregation and ranking.
//!
//! Trades inside a period are grouped by [`TimeSlot`] and summarised as the
//! mean P/L and mean premium capture rate per slot. Ranking orders those
//! rows by the metric being optimised.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::error::SlotwalkError;
use super::period::Period;
use super::time_slot::TimeSlot;
use super::trade::Trade;

/// The metric used to choose slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptimizeFor {
    #[default]
    Pnl,
    Pcr,
}

impl OptimizeFor {
    /// The row's metric. NaN counts as no value.
    pub fn value(&self, row: &SlotStats) -> Option<f64> {
        let value = match self {
            OptimizeFor::Pnl => Some(row.pnl),
            OptimizeFor::Pcr => row.pcr,
        };
        value.filter(|v| !v.is_nan())
    }

    pub fn label(&self) -> &'static str {
        match self {
            OptimizeFor::Pnl => "PnL",
            OptimizeFor::Pcr => "PCR",
        }
    }
}

impl fmt::Display for OptimizeFor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OptimizeFor {
    type Err = SlotwalkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pnl" => Ok(OptimizeFor::Pnl),
            "pcr" => Ok(OptimizeFor::Pcr),
            other => Err(SlotwalkError::invalid_parameter(
                "optimize_for",
                format!("unknown metric '{other}' (expected pnl or pcr)"),
            )),
        }
    }
}

/// Aggregated results for one time slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotStats {
    pub slot: TimeSlot,
    /// Mean net P/L per trade.
    pub pnl: f64,
    /// Mean premium capture rate over trades with a non-zero premium.
    pub pcr: Option<f64>,
    pub trades: usize,
    pub total_pnl: f64,
}

#[derive(Default)]
struct Accumulator {
    pnl_sum: f64,
    pcr_sum: f64,
    pcr_count: usize,
    trades: usize,
}

/// Group the trades entered within `period` by slot. Rows come back in slot order.
pub fn aggregate(trades: &[Trade], period: &Period) -> Vec<SlotStats> {
    let mut groups: BTreeMap<TimeSlot, Accumulator> = BTreeMap::new();

    for trade in trades.iter().filter(|t| period.contains(&t.entry_time)) {
        let acc = groups.entry(trade.slot()).or_default();
        acc.pnl_sum += trade.pnl();
        acc.trades += 1;
        if let Some(pcr) = trade.pcr() {
            acc.pcr_sum += pcr;
            acc.pcr_count += 1;
        }
    }

    groups
        .into_iter()
        .map(|(slot, acc)| SlotStats {
            slot,
            pnl: acc.pnl_sum / acc.trades as f64,
            pcr: (acc.pcr_count > 0).then(|| acc.pcr_sum / acc.pcr_count as f64),
            trades: acc.trades,
            total_pnl: acc.pnl_sum,
        })
        .collect()
}

/// Sort rows best first by `metric`. Rows without a value (or with NaN) go
/// last, and ties keep slot order.
pub fn rank(rows: &mut [SlotStats], metric: OptimizeFor) {
    rows.sort_by(|a, b| {
        let by_metric = match (metric.value(a), metric.value(b)) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_metric.then_with(|| a.slot.cmp(&b.slot))
    });
}
