//! HTTP request handlers for web adapter.

use askama::Template;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::tables::ResultsView;
use crate::domain::config_validation::DATE_FORMAT;
use crate::domain::error::SlotwalkError;
use crate::domain::params::{resolve_params, ParamOverrides};
use crate::domain::period::DataRange;
use crate::domain::trade::Trade;
use crate::domain::walk_forward;

use super::templates::{FormView, PageTemplate, ResultsTemplate};
use super::{is_htmx_request, AppState, WebError};

fn render<T: Template>(template: &T) -> Result<String, WebError> {
    template
        .render()
        .map_err(|e| WebError::internal(format!("template error: {e}")))
}

fn load(state: &AppState) -> Result<(Vec<Trade>, DataRange), WebError> {
    let trades = state.trade_port.load_trades()?;
    let range = DataRange::of(&trades).ok_or_else(|| SlotwalkError::NoData {
        source_name: state.trade_port.source(),
    })?;
    Ok((trades, range))
}

pub async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Response, WebError> {
    let (trades, range) = load(&state)?;
    let source = state.trade_port.source();

    // Config may carry dates that fall outside the data; fall back to the
    // data-derived defaults so the page still opens.
    let (params, message) =
        match resolve_params(&*state.config, &ParamOverrides::default(), &range) {
            Ok(params) => (params, String::new()),
            Err(e) => {
                log::warn!("configured parameters rejected: {e}");
                let empty = FileConfigAdapter::empty();
                let params = resolve_params(&empty, &ParamOverrides::default(), &range)?;
                (params, e.to_string())
            }
        };

    let result = walk_forward::run(&trades, &params);
    let template = PageTemplate {
        form: FormView::new(&source, &range, &params),
        results: if message.is_empty() {
            Some(ResultsView::new(&source, &result))
        } else {
            None
        },
        message,
    };
    Ok(Html(render(&template)?).into_response())
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub lookback_start: String,
    #[serde(default)]
    pub lookback_end: String,
    #[serde(default)]
    pub forward_start: String,
    #[serde(default)]
    pub forward_end: String,
    #[serde(default)]
    pub optimize_for: String,
    #[serde(default)]
    pub top_n: String,
}

fn form_date(name: &str, value: &str) -> Result<Option<NaiveDate>, SlotwalkError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(Some)
        .map_err(|_| SlotwalkError::invalid_parameter(name, format!("'{value}' is not a YYYY-MM-DD date")))
}

impl AnalyzeForm {
    /// Blank fields fall through to config and data defaults.
    pub fn overrides(&self) -> Result<ParamOverrides, SlotwalkError> {
        let optimize_for = match self.optimize_for.trim() {
            "" => None,
            s => Some(s.parse()?),
        };
        let top_n = match self.top_n.trim() {
            "" => None,
            s => Some(s.parse::<usize>().map_err(|_| {
                SlotwalkError::invalid_parameter("top_n", format!("'{s}' is not a whole number"))
            })?),
        };
        Ok(ParamOverrides {
            lookback_start: form_date("lookback_start", &self.lookback_start)?,
            lookback_end: form_date("lookback_end", &self.lookback_end)?,
            forward_start: form_date("forward_start", &self.forward_start)?,
            forward_end: form_date("forward_end", &self.forward_end)?,
            optimize_for,
            top_n,
        })
    }
}

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<AnalyzeForm>,
) -> Response {
    let htmx = is_htmx_request(&headers);
    match run_analysis(&state, &form, htmx) {
        Ok(resp) => resp,
        Err(e) if htmx => e.into_fragment_response(),
        Err(e) => e.into_response(),
    }
}

fn run_analysis(state: &AppState, form: &AnalyzeForm, htmx: bool) -> Result<Response, WebError> {
    let overrides = form.overrides()?;
    let (trades, range) = load(state)?;
    let params = resolve_params(&*state.config, &overrides, &range)?;
    let result = walk_forward::run(&trades, &params);
    let source = state.trade_port.source();
    log::info!(
        "web analysis: {} selected slots, forward avg PnL {:?}",
        result.lookback.len(),
        result.overall.avg_pnl
    );

    let view = ResultsView::new(&source, &result);
    let html = if htmx {
        render(&ResultsTemplate { view })?
    } else {
        render(&PageTemplate {
            form: FormView::new(&source, &range, &params),
            results: Some(view),
            message: String::new(),
        })?
    };
    Ok(Html(html).into_response())
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn not_found() -> Response {
    WebError::not_found("Page not found").into_response()
}
