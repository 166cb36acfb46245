//! CSV trade log adapter.
//!
//! Reads a backtest trade log with at least the columns `EntryTime`,
//! `ProfitLossAfterSlippage`, `CommissionFees` and `Premium`. Columns are
//! matched by header name, and any others are ignored.

use crate::domain::error::SlotwalkError;
use crate::domain::trade::{Trade, ENTRY_TIME_FORMAT};
use crate::ports::trade_port::TradePort;
use chrono::NaiveDateTime;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

pub const ENTRY_TIME: &str = "EntryTime";
pub const PROFIT_LOSS: &str = "ProfitLossAfterSlippage";
pub const COMMISSION_FEES: &str = "CommissionFees";
pub const PREMIUM: &str = "Premium";

pub struct CsvTradeAdapter {
    path: PathBuf,
}

impl CsvTradeAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TradePort for CsvTradeAdapter {
    fn load_trades(&self) -> Result<Vec<Trade>, SlotwalkError> {
        let file = File::open(&self.path).map_err(|e| SlotwalkError::DataRead {
            source_name: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        let trades = parse_trades(file)?;
        log::debug!("loaded {} trades from {}", trades.len(), self.path.display());
        Ok(trades)
    }

    fn source(&self) -> String {
        self.path.display().to_string()
    }
}

struct Columns {
    entry_time: usize,
    profit_loss: usize,
    commission_fees: usize,
    premium: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, SlotwalkError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| SlotwalkError::MissingColumn {
                    column: name.to_string(),
                })
        };
        Ok(Self {
            entry_time: find(ENTRY_TIME)?,
            profit_loss: find(PROFIT_LOSS)?,
            commission_fees: find(COMMISSION_FEES)?,
            premium: find(PREMIUM)?,
        })
    }
}

/// Parse a trade log. The result is sorted by entry time.
pub fn parse_trades<R: Read>(reader: R) -> Result<Vec<Trade>, SlotwalkError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers().map_err(|e| SlotwalkError::DataParse {
        line: 1,
        reason: format!("unreadable header: {e}"),
    })?;
    let columns = Columns::locate(headers)?;

    let mut trades = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| SlotwalkError::DataParse {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            reason: e.to_string(),
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let entry_str = field(&record, columns.entry_time, ENTRY_TIME, line)?;
        let entry_time =
            NaiveDateTime::parse_from_str(entry_str, ENTRY_TIME_FORMAT).map_err(|e| {
                SlotwalkError::DataParse {
                    line,
                    reason: format!("invalid {ENTRY_TIME} '{entry_str}': {e}"),
                }
            })?;

        trades.push(Trade {
            entry_time,
            profit_loss_after_slippage: number(&record, columns.profit_loss, PROFIT_LOSS, line)?,
            commission_fees: number(&record, columns.commission_fees, COMMISSION_FEES, line)?,
            premium: number(&record, columns.premium, PREMIUM, line)?,
        });
    }

    trades.sort_by_key(|t| t.entry_time);
    Ok(trades)
}

fn field<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
    line: u64,
) -> Result<&'r str, SlotwalkError> {
    record.get(index).ok_or_else(|| SlotwalkError::DataParse {
        line,
        reason: format!("missing {name} value"),
    })
}

fn number(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    line: u64,
) -> Result<f64, SlotwalkError> {
    let raw = field(record, index, name, line)?;
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(SlotwalkError::DataParse {
            line,
            reason: format!("invalid {name} value '{raw}'"),
        }),
    }
}
