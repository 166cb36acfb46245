#![allow(dead_code)]

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use slotwalk::domain::error::SlotwalkError;
pub use slotwalk::domain::trade::Trade;
use slotwalk::ports::trade_port::TradePort;

pub struct MockTradePort {
    pub trades: Vec<Trade>,
    pub error: Option<String>,
}

impl MockTradePort {
    pub fn new(trades: Vec<Trade>) -> Self {
        Self {
            trades,
            error: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            trades: Vec::new(),
            error: Some(reason.to_string()),
        }
    }
}

impl TradePort for MockTradePort {
    fn load_trades(&self) -> Result<Vec<Trade>, SlotwalkError> {
        if let Some(reason) = &self.error {
            return Err(SlotwalkError::DataRead {
                source_name: self.source(),
                reason: reason.clone(),
            });
        }
        Ok(self.trades.clone())
    }

    fn source(&self) -> String {
        "mock.csv".to_string()
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn make_trade(date: NaiveDate, hour: u32, minute: u32, pl: f64, premium: f64) -> Trade {
    Trade {
        entry_time: date.and_hms_opt(hour, minute, 0).unwrap(),
        profit_loss_after_slippage: pl,
        commission_fees: 4.0,
        premium,
    }
}

/// Eight weeks of weekday trades from Monday 2024-01-01 to Friday
/// 2024-02-23, at 10:00 and 14:30.
///
/// Monday 10:00 wins every week, Tuesday 14:30 loses every week, and the
/// remaining slots drift around zero.
pub fn sample_trades() -> Vec<Trade> {
    let start = date("2024-01-01");
    let mut trades = Vec::new();
    for offset in 0..54 {
        let day = start + Duration::days(offset);
        let week = (offset / 7) as f64;
        match day.weekday() {
            Weekday::Sat | Weekday::Sun => continue,
            Weekday::Mon => {
                trades.push(make_trade(day, 10, 0, 1.5, 200.0));
                trades.push(make_trade(day, 14, 30, 0.2, 150.0));
            }
            Weekday::Tue => {
                trades.push(make_trade(day, 10, 0, 0.3, 150.0));
                trades.push(make_trade(day, 14, 30, -0.8, 150.0));
            }
            _ => {
                let drift = if week as i64 % 2 == 0 { 0.1 } else { -0.1 };
                trades.push(make_trade(day, 10, 0, drift, 150.0));
                trades.push(make_trade(day, 14, 30, drift / 2.0, 0.0));
            }
        }
    }
    trades
}

/// The same trades in the CSV layout the data files use.
pub fn sample_csv() -> String {
    let mut out = String::from("EntryTime,ProfitLossAfterSlippage,CommissionFees,Premium,Legs\n");
    for t in sample_trades() {
        out.push_str(&format!(
            "{},{},{},{},SPX\n",
            t.entry_time.format("%m/%d/%Y %I:%M:%S %p"),
            t.profit_loss_after_slippage,
            t.commission_fees,
            t.premium
        ));
    }
    out
}

pub fn exit_code_eq(actual: std::process::ExitCode, expected: u8) -> bool {
    format!("{actual:?}") == format!("{:?}", std::process::ExitCode::from(expected))
}
