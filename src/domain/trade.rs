//! Trade records loaded from a backtest trade log.

use chrono::NaiveDateTime;

use super::time_slot::TimeSlot;

/// Dollar value of one point of option price.
pub const CONTRACT_MULTIPLIER: f64 = 100.0;

/// Timestamp format of the `EntryTime` column, e.g. "1/3/2023 9:45:00 AM".
pub const ENTRY_TIME_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub entry_time: NaiveDateTime,
    /// Per-contract P/L in option price points, after slippage.
    pub profit_loss_after_slippage: f64,
    pub commission_fees: f64,
    pub premium: f64,
}

impl Trade {
    /// Net dollar P/L after commissions.
    pub fn pnl(&self) -> f64 {
        self.profit_loss_after_slippage * CONTRACT_MULTIPLIER - self.commission_fees
    }

    /// Premium capture rate. `None` when the premium is zero.
    pub fn pcr(&self) -> Option<f64> {
        if self.premium == 0.0 {
            None
        } else {
            Some(self.pnl() / self.premium)
        }
    }

    pub fn slot(&self) -> TimeSlot {
        TimeSlot::from_datetime(&self.entry_time)
    }
}
