//! Web server adapter.
//!
//! Axum server with an HTMX frontend: a parameter sidebar on the left,
//! walk-forward results on the right. Submitting the form swaps the
//! results area in place.

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use templates::*;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::ports::config_port::ConfigPort;
use crate::ports::trade_port::TradePort;

pub struct AppState {
    pub trade_port: Arc<dyn TradePort + Send + Sync>,
    pub config: Arc<dyn ConfigPort + Send + Sync>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/analyze", post(handlers::analyze))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}
