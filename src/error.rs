use thiserror::Error;

/// Errors that can occur while forecasting or exporting a forecast.
#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Excel error: {0}")]
    Excel(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid parameter '{field}': {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Division undefined: {0}")]
    DivisionUndefined(String),
}

impl ForecastError {
    /// Shorthand for an [`ForecastError::InvalidParameter`] naming the offending field.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ForecastError::InvalidParameter {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The offending field, if this is a parameter error.
    pub fn field(&self) -> Option<&str> {
        match self {
            ForecastError::InvalidParameter { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for ForecastError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        ForecastError::Excel(e.to_string())
    }
}
