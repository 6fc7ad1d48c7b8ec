use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanError {
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoanError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        LoanError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

pub type LoanResult<T> = Result<T, LoanError>;
