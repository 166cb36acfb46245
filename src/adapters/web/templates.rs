//! HTML templates using Askama.

use askama::Template;

use crate::adapters::tables::ResultsView;
use crate::domain::period::DataRange;
use crate::domain::slot_stats::OptimizeFor;
use crate::domain::walk_forward::{WalkForwardParams, MAX_TOP_N, MIN_TOP_N};

/// Values shown in the parameter sidebar.
pub struct FormView {
    pub source: String,
    pub min_date: String,
    pub max_date: String,
    pub lookback_start: String,
    pub lookback_end: String,
    pub forward_start: String,
    pub forward_end: String,
    pub pnl_selected: bool,
    pub top_n: usize,
    pub min_top_n: usize,
    pub max_top_n: usize,
}

impl FormView {
    pub fn new(source: &str, range: &DataRange, params: &WalkForwardParams) -> Self {
        Self {
            source: source.to_string(),
            min_date: range.first.to_string(),
            max_date: range.last.to_string(),
            lookback_start: params.lookback.start.to_string(),
            lookback_end: params.lookback.end.to_string(),
            forward_start: params.forward.start.to_string(),
            forward_end: params.forward.end.to_string(),
            pnl_selected: params.optimize_for == OptimizeFor::Pnl,
            top_n: params.top_n,
            min_top_n: MIN_TOP_N,
            max_top_n: MAX_TOP_N,
        }
    }
}

#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate {
    pub form: FormView,
    pub results: Option<ResultsView>,
    pub message: String,
}

#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsTemplate {
    pub view: ResultsView,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub message: &'a str,
    pub status: u16,
}

/// Replaces `#results` when an HTMX request fails.
#[derive(Template)]
#[template(path = "error_fragment.html")]
pub struct ErrorFragmentTemplate<'a> {
    pub message: &'a str,
    pub status: u16,
}
