//! HTTP error responses for web adapter.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::domain::error::SlotwalkError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Error rendered into the `#results` slot. HTMX ignores 4xx/5xx
    /// bodies by default, so this goes out as 200.
    pub fn into_fragment_response(self) -> Response {
        let template = super::templates::ErrorFragmentTemplate {
            message: &self.message,
            status: self.status.as_u16(),
        };
        match template.render() {
            Ok(html) => Html(html).into_response(),
            Err(_) => (self.status, self.message).into_response(),
        }
    }
}

pub fn status_from_error(err: &SlotwalkError) -> StatusCode {
    match err {
        SlotwalkError::ConfigMissing { .. }
        | SlotwalkError::ConfigInvalid { .. }
        | SlotwalkError::ConfigParse { .. }
        | SlotwalkError::InvalidPeriod { .. }
        | SlotwalkError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
        SlotwalkError::NoData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        SlotwalkError::DataRead { .. }
        | SlotwalkError::DataParse { .. }
        | SlotwalkError::MissingColumn { .. }
        | SlotwalkError::Report { .. }
        | SlotwalkError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<SlotwalkError> for WebError {
    fn from(err: SlotwalkError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let template = super::templates::ErrorTemplate {
            message: &self.message,
            status: self.status.as_u16(),
        };
        match template.render() {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(_) => (self.status, self.message).into_response(),
        }
    }
}
