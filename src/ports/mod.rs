//! Port traits between the domain and its adapters.

pub mod config_port;
pub mod report_port;
pub mod trade_port;
