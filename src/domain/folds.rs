//! Rolling walk-forward: repeat the lookback/forward split across the data.

use chrono::{Days, NaiveDate};
use std::fmt;
use std::str::FromStr;

use super::error::SlotwalkError;
use super::period::{DataRange, Period};
use super::slot_stats::OptimizeFor;
use super::trade::Trade;
use super::walk_forward::{self, WalkForwardParams, WalkForwardResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    /// Fixed-length lookback that moves forward each fold.
    #[default]
    Sliding,
    /// Lookback always starts at the first trade and grows each fold.
    Anchored,
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowType::Sliding => f.write_str("sliding"),
            WindowType::Anchored => f.write_str("anchored"),
        }
    }
}

impl FromStr for WindowType {
    type Err = SlotwalkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sliding" => Ok(WindowType::Sliding),
            "anchored" => Ok(WindowType::Anchored),
            other => Err(SlotwalkError::invalid_parameter(
                "window",
                format!("unknown window type '{other}' (expected sliding or anchored)"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FoldPlan {
    pub lookback_days: i64,
    pub forward_days: i64,
    pub step_days: i64,
    pub window: WindowType,
}

impl FoldPlan {
    pub fn new(lookback_days: i64, forward_days: i64) -> Self {
        Self {
            lookback_days,
            forward_days,
            step_days: forward_days,
            window: WindowType::Sliding,
        }
    }

    fn validate(&self) -> Result<(), SlotwalkError> {
        for (name, value) in [
            ("lookback_days", self.lookback_days),
            ("forward_days", self.forward_days),
            ("step_days", self.step_days),
        ] {
            if value < 1 {
                return Err(SlotwalkError::invalid_parameter(
                    name,
                    format!("must be at least 1, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FoldResult {
    pub index: usize,
    pub result: WalkForwardResult,
}

/// Aggregate view over all folds.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldSummary {
    pub folds: usize,
    /// Folds whose forward slots traded at all.
    pub evaluated: usize,
    /// Folds with a positive forward average P/L.
    pub profitable: usize,
    pub mean_avg_pnl: Option<f64>,
    pub mean_avg_pcr: Option<f64>,
}

impl FoldSummary {
    pub fn from_folds(folds: &[FoldResult]) -> Self {
        let pnls: Vec<f64> = folds.iter().filter_map(|f| f.result.overall.avg_pnl).collect();
        let pcrs: Vec<f64> = folds.iter().filter_map(|f| f.result.overall.avg_pcr).collect();
        let mean = |v: &[f64]| (!v.is_empty()).then(|| v.iter().sum::<f64>() / v.len() as f64);
        Self {
            folds: folds.len(),
            evaluated: pnls.len(),
            profitable: pnls.iter().filter(|p| **p > 0.0).count(),
            mean_avg_pnl: mean(&pnls),
            mean_avg_pcr: mean(&pcrs),
        }
    }
}

/// Lay out lookback/forward pairs over `range`.
///
/// Each forward window starts the day after its lookback ends. The last
/// forward window is clipped to the final trade date. Planning stops once a
/// window would fall past the last representable date.
pub fn plan_folds(range: &DataRange, plan: &FoldPlan) -> Result<Vec<(Period, Period)>, SlotwalkError> {
    plan.validate()?;

    let mut folds = Vec::new();
    let mut offset = 0i64;
    loop {
        let bounds = match plan.window {
            WindowType::Sliding => shift(range.first, offset)
                .and_then(|start| Some((start, shift(start, plan.lookback_days - 1)?))),
            WindowType::Anchored => (plan.lookback_days - 1)
                .checked_add(offset)
                .and_then(|days| shift(range.first, days))
                .map(|end| (range.first, end)),
        };
        let Some((lookback_start, lookback_end)) = bounds else {
            break;
        };
        let Some(forward_start) = shift(lookback_end, 1).filter(|d| *d <= range.last) else {
            break;
        };
        let forward_end = shift(forward_start, plan.forward_days - 1)
            .map_or(range.last, |d| d.min(range.last));

        folds.push((
            Period {
                start: lookback_start,
                end: lookback_end,
            },
            Period {
                start: forward_start,
                end: forward_end,
            },
        ));
        match offset.checked_add(plan.step_days) {
            Some(next) => offset = next,
            None => break,
        }
    }
    Ok(folds)
}

/// `date` moved `days` forward, or `None` past the calendar's end.
fn shift(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let days = u64::try_from(days).ok()?;
    date.checked_add_days(Days::new(days))
}

/// Run a walk-forward pass for every fold in the plan.
pub fn run_folds(
    trades: &[Trade],
    range: &DataRange,
    plan: &FoldPlan,
    optimize_for: OptimizeFor,
    top_n: usize,
) -> Result<Vec<FoldResult>, SlotwalkError> {
    let windows = plan_folds(range, plan)?;
    if windows.is_empty() {
        return Err(SlotwalkError::invalid_parameter(
            "lookback_days",
            format!(
                "a {}-day lookback leaves no forward data in {} to {}",
                plan.lookback_days, range.first, range.last
            ),
        ));
    }

    let mut results = Vec::with_capacity(windows.len());
    for (index, (lookback, forward)) in windows.into_iter().enumerate() {
        let params = WalkForwardParams {
            lookback,
            forward,
            optimize_for,
            top_n,
        };
        walk_forward::validate_params(&params, range)?;
        results.push(FoldResult {
            index,
            result: walk_forward::run(trades, &params),
        });
    }
    log::info!("ran {} walk-forward folds ({})", results.len(), plan.window);
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range(first: NaiveDate, last: NaiveDate) -> DataRange {
        DataRange {
            first,
            last,
            trades: 0,
        }
    }

    #[test]
    fn sliding_windows_move_by_step() {
        let r = range(date(2024, 1, 1), date(2024, 1, 30));
        let folds = plan_folds(&r, &FoldPlan::new(10, 5)).unwrap();

        assert_eq!(folds.len(), 4);
        assert_eq!(folds[0].0, Period { start: date(2024, 1, 1), end: date(2024, 1, 10) });
        assert_eq!(folds[0].1, Period { start: date(2024, 1, 11), end: date(2024, 1, 15) });
        assert_eq!(folds[1].0.start, date(2024, 1, 6));
        assert_eq!(folds[3].1, Period { start: date(2024, 1, 26), end: date(2024, 1, 30) });
    }

    #[test]
    fn anchored_windows_grow_from_first_date() {
        let r = range(date(2024, 1, 1), date(2024, 1, 30));
        let mut plan = FoldPlan::new(10, 5);
        plan.window = WindowType::Anchored;
        let folds = plan_folds(&r, &plan).unwrap();

        assert!(folds.iter().all(|(lb, _)| lb.start == date(2024, 1, 1)));
        assert_eq!(folds[1].0.end, date(2024, 1, 15));
        assert_eq!(folds.len(), 4);
    }

    #[test]
    fn last_forward_window_is_clipped() {
        let r = range(date(2024, 1, 1), date(2024, 1, 13));
        let folds = plan_folds(&r, &FoldPlan::new(10, 5)).unwrap();
        assert_eq!(folds.len(), 1);
        assert_eq!(folds[0].1.end, date(2024, 1, 13));
    }

    #[test]
    fn lookback_longer_than_data_yields_no_folds() {
        let r = range(date(2024, 1, 1), date(2024, 1, 5));
        assert!(plan_folds(&r, &FoldPlan::new(10, 5)).unwrap().is_empty());
    }

    #[test]
    fn non_positive_lengths_are_rejected() {
        let r = range(date(2024, 1, 1), date(2024, 1, 30));
        assert!(plan_folds(&r, &FoldPlan::new(0, 5)).is_err());
        let mut plan = FoldPlan::new(10, 5);
        plan.step_days = 0;
        assert!(plan_folds(&r, &plan).is_err());
    }

    #[test]
    fn huge_step_stops_after_first_fold() {
        let r = range(date(2024, 1, 1), date(2024, 6, 30));
        let mut plan = FoldPlan::new(30, 30);
        plan.step_days = 1_000_000_000;
        let folds = plan_folds(&r, &plan).unwrap();
        assert_eq!(folds.len(), 1);

        plan.step_days = i64::MAX;
        plan.window = WindowType::Anchored;
        assert_eq!(plan_folds(&r, &plan).unwrap().len(), 1);
    }

    #[test]
    fn huge_lengths_yield_no_folds() {
        let r = range(date(2024, 1, 1), date(2024, 6, 30));
        assert!(plan_folds(&r, &FoldPlan::new(i64::MAX, 5)).unwrap().is_empty());

        let mut plan = FoldPlan::new(i64::MAX, 5);
        plan.window = WindowType::Anchored;
        assert!(plan_folds(&r, &plan).unwrap().is_empty());

        // forward window past the calendar end is clipped to the data
        let folds = plan_folds(&r, &FoldPlan::new(30, i64::MAX)).unwrap();
        assert_eq!(folds[0].1.end, date(2024, 6, 30));
    }

    #[test]
    fn window_type_parses() {
        assert_eq!("Anchored".parse::<WindowType>().unwrap(), WindowType::Anchored);
        assert!("expanding".parse::<WindowType>().is_err());
    }

    #[test]
    fn run_folds_errors_when_no_fold_fits() {
        let r = range(date(2024, 1, 1), date(2024, 1, 5));
        let err = run_folds(&[], &r, &FoldPlan::new(10, 5), OptimizeFor::Pnl, 5).unwrap_err();
        assert!(matches!(err, SlotwalkError::InvalidParameter { .. }));
    }

    #[test]
    fn run_folds_evaluates_each_window() {
        // Every Monday at 10:00 in January 2024 earns 1 point
        let trades: Vec<Trade> = [1, 8, 15, 22, 29]
            .iter()
            .map(|d| Trade {
                entry_time: date(2024, 1, *d).and_hms_opt(10, 0, 0).unwrap(),
                profit_loss_after_slippage: 1.0,
                commission_fees: 0.0,
                premium: 100.0,
            })
            .collect();
        let r = DataRange::of(&trades).unwrap();
        let folds = run_folds(&trades, &r, &FoldPlan::new(14, 7), OptimizeFor::Pnl, 3).unwrap();

        // Forward windows: Jan 15-21, Jan 22-28, Jan 29 (clipped)
        assert_eq!(folds.len(), 3);
        assert_eq!(folds[2].index, 2);
        assert_eq!(folds[2].result.params.forward.start, date(2024, 1, 29));
        let summary = FoldSummary::from_folds(&folds);
        assert_eq!(summary.folds, 3);
        assert_eq!(summary.evaluated, 3);
        assert_eq!(summary.profitable, 3);
        assert_relative_eq!(summary.mean_avg_pnl.unwrap(), 100.0);
        assert_relative_eq!(summary.mean_avg_pcr.unwrap(), 1.0);
    }
}
