//! Trade data access port trait.

use crate::domain::error::SlotwalkError;
use crate::domain::period::DataRange;
use crate::domain::trade::Trade;

pub trait TradePort {
    /// Every trade in the source, ordered by entry time.
    fn load_trades(&self) -> Result<Vec<Trade>, SlotwalkError>;

    /// Human-readable name of the source, used in messages.
    fn source(&self) -> String;

    /// First and last entry dates, or `None` for an empty source.
    fn data_range(&self) -> Result<Option<DataRange>, SlotwalkError> {
        Ok(DataRange::of(&self.load_trades()?))
    }
}
