//! Domain error types.

/// Top-level error type for slotwalk.
#[derive(Debug, thiserror::Error)]
pub enum SlotwalkError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to read trade data from {source_name}: {reason}")]
    DataRead { source_name: String, reason: String },

    #[error("trade data parse error at line {line}: {reason}")]
    DataParse { line: u64, reason: String },

    #[error("trade data is missing column {column}")]
    MissingColumn { column: String },

    #[error("invalid {name} period: {reason}")]
    InvalidPeriod { name: String, reason: String },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("no trades in {source_name}")]
    NoData { source_name: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SlotwalkError {
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        SlotwalkError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_period(name: &str, reason: impl Into<String>) -> Self {
        SlotwalkError::InvalidPeriod {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&SlotwalkError> for std::process::ExitCode {
    fn from(err: &SlotwalkError) -> Self {
        let code: u8 = match err {
            SlotwalkError::Io(_) | SlotwalkError::Report { .. } => 1,
            SlotwalkError::ConfigParse { .. }
            | SlotwalkError::ConfigMissing { .. }
            | SlotwalkError::ConfigInvalid { .. } => 2,
            SlotwalkError::DataRead { .. }
            | SlotwalkError::DataParse { .. }
            | SlotwalkError::MissingColumn { .. } => 3,
            SlotwalkError::InvalidPeriod { .. } | SlotwalkError::InvalidParameter { .. } => 4,
            SlotwalkError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
