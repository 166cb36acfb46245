//! Core domain types and logic.

pub mod trade;
pub mod time_slot;
pub mod period;
pub mod slot_stats;
pub mod walk_forward;
pub mod folds;
pub mod params;
pub mod config_validation;
pub mod error;
