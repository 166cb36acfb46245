//! Parameter resolution.
//!
//! Each value comes from the first source that sets it: explicit override
//! (CLI flag or web form), then config file, then a default derived from
//! the data range.

use chrono::NaiveDate;

use crate::domain::config_validation::parse_optional_date;
use crate::domain::error::SlotwalkError;
use crate::domain::folds::{FoldPlan, WindowType};
use crate::domain::period::{default_periods, DataRange, Period};
use crate::domain::slot_stats::OptimizeFor;
use crate::domain::walk_forward::{validate_params, WalkForwardParams, DEFAULT_TOP_N};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_LOOKBACK_DAYS: i64 = 90;
pub const DEFAULT_FORWARD_DAYS: i64 = 30;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamOverrides {
    pub lookback_start: Option<NaiveDate>,
    pub lookback_end: Option<NaiveDate>,
    pub forward_start: Option<NaiveDate>,
    pub forward_end: Option<NaiveDate>,
    pub optimize_for: Option<OptimizeFor>,
    pub top_n: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoldOverrides {
    pub lookback_days: Option<i64>,
    pub forward_days: Option<i64>,
    pub step_days: Option<i64>,
    pub window: Option<WindowType>,
}

fn config_date(config: &dyn ConfigPort, key: &str) -> Result<Option<NaiveDate>, SlotwalkError> {
    parse_optional_date(config, "walk_forward", key)
}

/// `[section] key` as an integer when present. A value that does not parse
/// is an error rather than a silent default.
fn config_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<i64>, SlotwalkError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.trim().parse().map(Some).map_err(|_| {
            SlotwalkError::invalid_parameter(
                key,
                format!("[{section}] {key} = '{s}' is not a whole number"),
            )
        }),
    }
}

pub fn resolve_optimize_for(
    config: &dyn ConfigPort,
    explicit: Option<OptimizeFor>,
) -> Result<OptimizeFor, SlotwalkError> {
    if let Some(m) = explicit {
        return Ok(m);
    }
    match config.get_string("walk_forward", "optimize_for") {
        Some(s) => s.parse(),
        None => Ok(OptimizeFor::default()),
    }
}

/// Negative config values resolve to 0 so that range validation rejects them.
pub fn resolve_top_n(
    config: &dyn ConfigPort,
    explicit: Option<usize>,
) -> Result<usize, SlotwalkError> {
    if let Some(n) = explicit {
        return Ok(n);
    }
    Ok(match config_int(config, "walk_forward", "top_n")? {
        Some(n) => usize::try_from(n).unwrap_or(0),
        None => DEFAULT_TOP_N,
    })
}

/// Resolve and validate walk-forward parameters against the data range.
///
/// The forward start defaults to the resolved lookback end, so moving the
/// lookback end moves the forward start with it.
pub fn resolve_params(
    config: &dyn ConfigPort,
    overrides: &ParamOverrides,
    range: &DataRange,
) -> Result<WalkForwardParams, SlotwalkError> {
    let (default_lookback, _) = default_periods(range);

    let lookback_start = match overrides.lookback_start {
        Some(d) => d,
        None => config_date(config, "lookback_start")?.unwrap_or(default_lookback.start),
    };
    let lookback_end = match overrides.lookback_end {
        Some(d) => d,
        None => config_date(config, "lookback_end")?.unwrap_or(default_lookback.end),
    };
    let forward_start = match overrides.forward_start {
        Some(d) => d,
        None => config_date(config, "forward_start")?.unwrap_or(lookback_end),
    };
    let forward_end = match overrides.forward_end {
        Some(d) => d,
        None => config_date(config, "forward_end")?.unwrap_or(range.last),
    };

    let params = WalkForwardParams {
        lookback: Period::named("lookback", lookback_start, lookback_end)?,
        forward: Period::named("forward", forward_start, forward_end)?,
        optimize_for: resolve_optimize_for(config, overrides.optimize_for)?,
        top_n: resolve_top_n(config, overrides.top_n)?,
    };
    validate_params(&params, range)?;

    log::debug!(
        "resolved params: lookback {}, forward {}, {} top {}",
        params.lookback,
        params.forward,
        params.optimize_for,
        params.top_n
    );
    Ok(params)
}

pub fn resolve_fold_plan(
    config: &dyn ConfigPort,
    overrides: &FoldOverrides,
) -> Result<FoldPlan, SlotwalkError> {
    let days = |explicit: Option<i64>, key: &str, default: i64| match explicit {
        Some(d) => Ok(d),
        None => config_int(config, "folds", key).map(|d| d.unwrap_or(default)),
    };
    let lookback_days = days(overrides.lookback_days, "lookback_days", DEFAULT_LOOKBACK_DAYS)?;
    let forward_days = days(overrides.forward_days, "forward_days", DEFAULT_FORWARD_DAYS)?;
    let step_days = days(overrides.step_days, "step_days", forward_days)?;
    let window = match overrides.window {
        Some(w) => w,
        None => match config.get_string("folds", "window") {
            Some(s) => s.parse()?,
            None => WindowType::default(),
        },
    };
    Ok(FoldPlan {
        lookback_days,
        forward_days,
        step_days,
        window,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn range() -> DataRange {
        DataRange {
            first: date(1, 1),
            last: date(3, 1),
            trades: 100,
        }
    }

    fn config(ini: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(ini).unwrap()
    }

    #[test]
    fn defaults_split_range_at_midpoint() {
        let params = resolve_params(&config(""), &ParamOverrides::default(), &range()).unwrap();
        // 60 days from Jan 1 to Mar 1 2024, midpoint Jan 31
        assert_eq!(params.lookback, Period::new(date(1, 1), date(1, 31)).unwrap());
        assert_eq!(params.forward, Period::new(date(1, 31), date(3, 1)).unwrap());
        assert_eq!(params.optimize_for, OptimizeFor::Pnl);
        assert_eq!(params.top_n, DEFAULT_TOP_N);
    }

    #[test]
    fn config_values_are_used() {
        let ini = "[walk_forward]\nlookback_end = 2024-01-20\noptimize_for = pcr\ntop_n = 3\n";
        let params = resolve_params(&config(ini), &ParamOverrides::default(), &range()).unwrap();
        assert_eq!(params.lookback.end, date(1, 20));
        // forward start follows the lookback end
        assert_eq!(params.forward.start, date(1, 20));
        assert_eq!(params.optimize_for, OptimizeFor::Pcr);
        assert_eq!(params.top_n, 3);
    }

    #[test]
    fn overrides_beat_config() {
        let ini = "[walk_forward]\nlookback_end = 2024-01-20\ntop_n = 3\n";
        let overrides = ParamOverrides {
            lookback_end: Some(date(2, 1)),
            forward_end: Some(date(2, 20)),
            top_n: Some(8),
            optimize_for: Some(OptimizeFor::Pcr),
            ..Default::default()
        };
        let params = resolve_params(&config(ini), &overrides, &range()).unwrap();
        assert_eq!(params.lookback.end, date(2, 1));
        assert_eq!(params.forward, Period::new(date(2, 1), date(2, 20)).unwrap());
        assert_eq!(params.top_n, 8);
        assert_eq!(params.optimize_for, OptimizeFor::Pcr);
    }

    #[test]
    fn out_of_range_override_is_rejected() {
        let overrides = ParamOverrides {
            forward_end: Some(date(4, 1)),
            ..Default::default()
        };
        let err = resolve_params(&config(""), &overrides, &range()).unwrap_err();
        assert!(matches!(err, SlotwalkError::InvalidPeriod { .. }));
    }

    #[test]
    fn reversed_override_names_period() {
        let overrides = ParamOverrides {
            lookback_start: Some(date(2, 10)),
            lookback_end: Some(date(2, 1)),
            ..Default::default()
        };
        let err = resolve_params(&config(""), &overrides, &range()).unwrap_err();
        assert!(matches!(err, SlotwalkError::InvalidPeriod { ref name, .. } if name == "lookback"));
    }

    #[test]
    fn negative_top_n_in_config_fails_validation() {
        let ini = "[walk_forward]\ntop_n = -3\n";
        let err = resolve_params(&config(ini), &ParamOverrides::default(), &range()).unwrap_err();
        assert!(matches!(err, SlotwalkError::InvalidParameter { .. }));
    }

    #[test]
    fn unparsable_top_n_is_an_error() {
        let cfg = config("[walk_forward]\ntop_n = abc\n");
        assert!(matches!(
            resolve_top_n(&cfg, None),
            Err(SlotwalkError::InvalidParameter { ref name, .. }) if name == "top_n"
        ));
        // an explicit value never consults the config
        assert_eq!(resolve_top_n(&cfg, Some(4)).unwrap(), 4);
        assert_eq!(resolve_top_n(&config(""), None).unwrap(), DEFAULT_TOP_N);
    }

    #[test]
    fn unparsable_fold_days_are_an_error() {
        let cfg = config("[folds]\nstep_days = weekly\n");
        let err = resolve_fold_plan(&cfg, &FoldOverrides::default()).unwrap_err();
        assert!(matches!(err, SlotwalkError::InvalidParameter { ref name, .. } if name == "step_days"));
    }

    #[test]
    fn fold_plan_defaults_and_overrides() {
        let plan = resolve_fold_plan(&config(""), &FoldOverrides::default()).unwrap();
        assert_eq!(plan.lookback_days, DEFAULT_LOOKBACK_DAYS);
        assert_eq!(plan.forward_days, DEFAULT_FORWARD_DAYS);
        assert_eq!(plan.step_days, DEFAULT_FORWARD_DAYS);
        assert_eq!(plan.window, WindowType::Sliding);

        let ini = "[folds]\nforward_days = 14\nwindow = anchored\n";
        let overrides = FoldOverrides {
            lookback_days: Some(60),
            ..Default::default()
        };
        let plan = resolve_fold_plan(&config(ini), &overrides).unwrap();
        assert_eq!(plan.lookback_days, 60);
        assert_eq!(plan.forward_days, 14);
        assert_eq!(plan.step_days, 14);
        assert_eq!(plan.window, WindowType::Anchored);
    }
}
