//! Walk-forward selection of entry time slots.
//!
//! The best `top_n` slots are picked on the lookback period. The same slots
//! are then measured on the forward period.

use std::collections::HashSet;

use super::error::SlotwalkError;
use super::period::{DataRange, Period};
use super::slot_stats::{aggregate, rank, OptimizeFor, SlotStats};
use super::time_slot::TimeSlot;
use super::trade::Trade;

pub const DEFAULT_TOP_N: usize = 5;
pub const MIN_TOP_N: usize = 1;
pub const MAX_TOP_N: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct WalkForwardParams {
    pub lookback: Period,
    pub forward: Period,
    pub optimize_for: OptimizeFor,
    pub top_n: usize,
}

/// Summary of the forward table.
///
/// The averages are taken over the table's rows, so every slot counts once
/// however many trades it holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Overall {
    pub avg_pnl: Option<f64>,
    pub avg_pcr: Option<f64>,
    pub slots: usize,
    pub trades: usize,
    pub total_pnl: f64,
}

impl Overall {
    pub fn from_rows(rows: &[SlotStats]) -> Self {
        let avg_pnl = mean(rows.iter().map(|r| r.pnl));
        let avg_pcr = mean(rows.iter().filter_map(|r| r.pcr));
        Self {
            avg_pnl,
            avg_pcr,
            slots: rows.len(),
            trades: rows.iter().map(|r| r.trades).sum(),
            total_pnl: rows.iter().map(|r| r.total_pnl).sum(),
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalkForwardResult {
    pub params: WalkForwardParams,
    /// Top slots of the lookback period, best first.
    pub lookback: Vec<SlotStats>,
    /// Forward performance of the lookback slots that traded, best first.
    pub forward: Vec<SlotStats>,
    pub overall: Overall,
}

impl WalkForwardResult {
    pub fn selected_slots(&self) -> Vec<TimeSlot> {
        self.lookback.iter().map(|r| r.slot).collect()
    }
}

/// Check the parameters against the data they will run on.
pub fn validate_params(params: &WalkForwardParams, range: &DataRange) -> Result<(), SlotwalkError> {
    if params.top_n < MIN_TOP_N || params.top_n > MAX_TOP_N {
        return Err(SlotwalkError::invalid_parameter(
            "top_n",
            format!(
                "must be between {MIN_TOP_N} and {MAX_TOP_N}, got {}",
                params.top_n
            ),
        ));
    }

    check_order("lookback", &params.lookback)?;
    check_order("forward", &params.forward)?;

    if params.lookback.start < range.first {
        return Err(SlotwalkError::invalid_period(
            "lookback",
            format!(
                "start {} is before the first trade on {}",
                params.lookback.start, range.first
            ),
        ));
    }
    if params.lookback.end > range.last {
        return Err(SlotwalkError::invalid_period(
            "lookback",
            format!(
                "end {} is after the last trade on {}",
                params.lookback.end, range.last
            ),
        ));
    }
    if params.forward.start < params.lookback.end {
        return Err(SlotwalkError::invalid_period(
            "forward",
            format!(
                "start {} is before the lookback end {}",
                params.forward.start, params.lookback.end
            ),
        ));
    }
    if params.forward.end > range.last {
        return Err(SlotwalkError::invalid_period(
            "forward",
            format!(
                "end {} is after the last trade on {}",
                params.forward.end, range.last
            ),
        ));
    }
    Ok(())
}

fn check_order(name: &str, period: &Period) -> Result<(), SlotwalkError> {
    if period.start > period.end {
        return Err(SlotwalkError::invalid_period(
            name,
            format!("start {} is after end {}", period.start, period.end),
        ));
    }
    Ok(())
}

/// Run one walk-forward pass over `trades`.
pub fn run(trades: &[Trade], params: &WalkForwardParams) -> WalkForwardResult {
    let mut lookback = aggregate(trades, &params.lookback);
    rank(&mut lookback, params.optimize_for);
    lookback.truncate(params.top_n);

    let selected: HashSet<TimeSlot> = lookback.iter().map(|r| r.slot).collect();
    let mut forward: Vec<SlotStats> = aggregate(trades, &params.forward)
        .into_iter()
        .filter(|r| selected.contains(&r.slot))
        .collect();
    rank(&mut forward, params.optimize_for);

    log::debug!(
        "walk-forward: {} lookback slots selected, {} traded in forward period",
        lookback.len(),
        forward.len()
    );

    let overall = Overall::from_rows(&forward);
    WalkForwardResult {
        params: params.clone(),
        lookback,
        forward,
        overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn trade(d: NaiveDate, h: u32, min: u32, pl: f64) -> Trade {
        Trade {
            entry_time: d.and_hms_opt(h, min, 0).unwrap(),
            profit_loss_after_slippage: pl,
            commission_fees: 0.0,
            premium: 100.0,
        }
    }

    fn params(top_n: usize) -> WalkForwardParams {
        WalkForwardParams {
            lookback: Period::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap(),
            forward: Period::new(date(2024, 2, 1), date(2024, 2, 29)).unwrap(),
            optimize_for: OptimizeFor::Pnl,
            top_n,
        }
    }

    fn range() -> DataRange {
        DataRange {
            first: date(2024, 1, 1),
            last: date(2024, 2, 29),
            trades: 0,
        }
    }

    // Mondays: 2024-01-15 (lookback), 2024-02-05 (forward)
    // Tuesdays: 2024-01-16 (lookback), 2024-02-06 (forward)
    fn sample_trades() -> Vec<Trade> {
        vec![
            trade(date(2024, 1, 15), 10, 0, 3.0),
            trade(date(2024, 1, 15), 11, 0, 1.0),
            trade(date(2024, 1, 16), 10, 0, 2.0),
            trade(date(2024, 1, 16), 11, 0, -1.0),
            trade(date(2024, 2, 5), 10, 0, -0.5),
            trade(date(2024, 2, 5), 11, 0, 4.0),
            trade(date(2024, 2, 6), 10, 0, 1.5),
            trade(date(2024, 2, 6), 11, 0, 2.0),
        ]
    }

    #[test]
    fn lookback_is_truncated_to_top_n() {
        let result = run(&sample_trades(), &params(2));
        let labels: Vec<String> = result.lookback.iter().map(|r| r.slot.to_string()).collect();
        assert_eq!(labels, vec!["Monday 10:00 AM", "Tuesday 10:00 AM"]);
    }

    #[test]
    fn forward_only_contains_selected_slots() {
        let result = run(&sample_trades(), &params(2));
        let selected = result.selected_slots();
        assert_eq!(result.forward.len(), 2);
        assert!(result.forward.iter().all(|r| selected.contains(&r.slot)));
        // Ranked on forward values: Tuesday 10:00 (150) before Monday 10:00 (-50)
        assert_eq!(result.forward[0].slot.to_string(), "Tuesday 10:00 AM");
        assert_relative_eq!(result.forward[0].pnl, 150.0);
        assert_relative_eq!(result.forward[1].pnl, -50.0);
    }

    #[test]
    fn overall_averages_forward_rows() {
        let result = run(&sample_trades(), &params(2));
        assert_relative_eq!(result.overall.avg_pnl.unwrap(), 50.0);
        assert_relative_eq!(result.overall.avg_pcr.unwrap(), 0.5);
        assert_eq!(result.overall.slots, 2);
        assert_eq!(result.overall.trades, 2);
        assert_relative_eq!(result.overall.total_pnl, 100.0);
    }

    #[test]
    fn top_n_larger_than_slot_count_keeps_everything() {
        let result = run(&sample_trades(), &params(20));
        assert_eq!(result.lookback.len(), 4);
        assert_eq!(result.forward.len(), 4);
    }

    #[test]
    fn empty_forward_gives_no_overall_averages() {
        let mut p = params(5);
        p.forward = Period::new(date(2024, 2, 20), date(2024, 2, 29)).unwrap();
        let result = run(&sample_trades(), &p);
        assert!(result.forward.is_empty());
        assert_eq!(result.overall.avg_pnl, None);
        assert_eq!(result.overall.avg_pcr, None);
        assert_eq!(result.overall.trades, 0);
    }

    #[test]
    fn forward_weekday_must_match_not_just_time() {
        let trades = vec![
            trade(date(2024, 1, 15), 10, 0, 1.0),
            // Tuesday at the same time is a different slot
            trade(date(2024, 2, 6), 10, 0, 1.0),
        ];
        let result = run(&trades, &params(5));
        assert_eq!(result.lookback.len(), 1);
        assert!(result.forward.is_empty());
    }

    #[test]
    fn validate_accepts_defaults_shape() {
        let mut p = params(5);
        p.forward.start = p.lookback.end;
        assert!(validate_params(&p, &range()).is_ok());
    }

    #[test]
    fn validate_rejects_top_n_out_of_range() {
        assert!(matches!(
            validate_params(&params(0), &range()),
            Err(SlotwalkError::InvalidParameter { .. })
        ));
        assert!(validate_params(&params(21), &range()).is_err());
        assert!(validate_params(&params(20), &range()).is_ok());
    }

    #[test]
    fn validate_rejects_forward_before_lookback_end() {
        let mut p = params(5);
        p.forward.start = date(2024, 1, 30);
        let err = validate_params(&p, &range()).unwrap_err();
        assert!(matches!(err, SlotwalkError::InvalidPeriod { ref name, .. } if name == "forward"));
    }

    #[test]
    fn validate_rejects_periods_outside_data() {
        let mut p = params(5);
        p.lookback.start = date(2023, 12, 31);
        assert!(validate_params(&p, &range()).is_err());

        let mut p = params(5);
        p.forward.end = date(2024, 3, 1);
        assert!(validate_params(&p, &range()).is_err());
    }

    #[test]
    fn validate_rejects_reversed_period() {
        let mut p = params(5);
        p.lookback = Period {
            start: date(2024, 1, 20),
            end: date(2024, 1, 10),
        };
        let err = validate_params(&p, &range()).unwrap_err();
        assert!(matches!(err, SlotwalkError::InvalidPeriod { ref name, .. } if name == "lookback"));
    }
}
