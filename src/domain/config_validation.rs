//! Configuration validation.
//!
//! Checks config values before any trade data is loaded. Period bounds that
//! depend on the data are checked later by [`validate_params`].
//!
//! [`validate_params`]: crate::domain::walk_forward::validate_params

use crate::domain::error::SlotwalkError;
use crate::domain::folds::WindowType;
use crate::domain::slot_stats::OptimizeFor;
use crate::domain::walk_forward::{MAX_TOP_N, MIN_TOP_N};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::net::SocketAddr;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const WALK_FORWARD_DATES: [&str; 4] = [
    "lookback_start",
    "lookback_end",
    "forward_start",
    "forward_end",
];

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), SlotwalkError> {
    match config.get_string("data", "path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(SlotwalkError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        }),
    }
}

pub fn validate_walk_forward_config(config: &dyn ConfigPort) -> Result<(), SlotwalkError> {
    for key in WALK_FORWARD_DATES {
        parse_optional_date(config, "walk_forward", key)?;
    }
    validate_date_order(config, "lookback_start", "lookback_end")?;
    validate_date_order(config, "forward_start", "forward_end")?;
    validate_date_order(config, "lookback_end", "forward_start")?;
    validate_selection_config(config)
}

/// `[walk_forward] optimize_for` and `top_n`, which rolling folds share with
/// a single walk-forward pass.
pub fn validate_selection_config(config: &dyn ConfigPort) -> Result<(), SlotwalkError> {
    validate_optimize_for(config)?;
    validate_top_n(config)
}

pub fn validate_fold_config(config: &dyn ConfigPort) -> Result<(), SlotwalkError> {
    for key in ["lookback_days", "forward_days", "step_days"] {
        if config.get_string("folds", key).is_none() {
            continue;
        }
        let value = config.get_int("folds", key, 0);
        if value < 1 {
            return Err(SlotwalkError::ConfigInvalid {
                section: "folds".to_string(),
                key: key.to_string(),
                reason: format!("{key} must be a positive number of days"),
            });
        }
    }
    if let Some(window) = config.get_string("folds", "window") {
        window
            .parse::<WindowType>()
            .map_err(|_| SlotwalkError::ConfigInvalid {
                section: "folds".to_string(),
                key: "window".to_string(),
                reason: "window must be sliding or anchored".to_string(),
            })?;
    }
    Ok(())
}

pub fn validate_web_config(config: &dyn ConfigPort) -> Result<(), SlotwalkError> {
    if let Some(listen) = config.get_string("web", "listen") {
        listen
            .parse::<SocketAddr>()
            .map_err(|_| SlotwalkError::ConfigInvalid {
                section: "web".to_string(),
                key: "listen".to_string(),
                reason: format!("'{listen}' is not a socket address (host:port)"),
            })?;
    }
    Ok(())
}

/// Parse `[section] key` as a date when present.
pub fn parse_optional_date(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<NaiveDate>, SlotwalkError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .map(Some)
            .map_err(|_| SlotwalkError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("invalid {key} format, expected YYYY-MM-DD"),
            }),
    }
}

fn validate_date_order(
    config: &dyn ConfigPort,
    earlier: &str,
    later: &str,
) -> Result<(), SlotwalkError> {
    let a = parse_optional_date(config, "walk_forward", earlier)?;
    let b = parse_optional_date(config, "walk_forward", later)?;
    if let (Some(a), Some(b)) = (a, b) {
        if a > b {
            return Err(SlotwalkError::ConfigInvalid {
                section: "walk_forward".to_string(),
                key: earlier.to_string(),
                reason: format!("{earlier} must not be after {later}"),
            });
        }
    }
    Ok(())
}

fn validate_optimize_for(config: &dyn ConfigPort) -> Result<(), SlotwalkError> {
    if let Some(value) = config.get_string("walk_forward", "optimize_for") {
        value
            .parse::<OptimizeFor>()
            .map_err(|_| SlotwalkError::ConfigInvalid {
                section: "walk_forward".to_string(),
                key: "optimize_for".to_string(),
                reason: "optimize_for must be pnl or pcr".to_string(),
            })?;
    }
    Ok(())
}

fn validate_top_n(config: &dyn ConfigPort) -> Result<(), SlotwalkError> {
    if config.get_string("walk_forward", "top_n").is_none() {
        return Ok(());
    }
    let value = config.get_int("walk_forward", "top_n", 0);
    if value < MIN_TOP_N as i64 || value > MAX_TOP_N as i64 {
        return Err(SlotwalkError::ConfigInvalid {
            section: "walk_forward".to_string(),
            key: "top_n".to_string(),
            reason: format!("top_n must be between {MIN_TOP_N} and {MAX_TOP_N}"),
        });
    }
    Ok(())
}
