use thiserror::Error;

use crate::validation::FormField;

/// Shown when a submission is rejected before reaching the network.
pub const MISSING_FIELDS_MESSAGE: &str = "Vui lòng điền đầy đủ thông tin";
/// Shown for every failed prediction call, whatever the underlying cause.
pub const PREDICTION_FAILED_MESSAGE: &str = "Lỗi khi dự đoán giá. Vui lòng thử lại.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("required field is missing: {field}")]
    MissingField { field: FormField },
}

impl ValidationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::MissingField { .. } => MISSING_FIELDS_MESSAGE,
        }
    }
}

/// Failure of a call to the estimation backend. The variants only matter for
/// diagnostics; the form treats all of them the same way.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("backend returned HTTP {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid backend url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("backend unavailable: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum FormatError {
    #[error("cannot format non-finite price {0}")]
    NonFinite(f64),
}
