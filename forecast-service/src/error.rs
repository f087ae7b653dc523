use ledger_store::StoreError;
use thiserror::Error;

/// Forecasting error taxonomy. Only `InvalidInput` and `Db` can reach the
/// wire envelope; `Config` is raised once at construction.
#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("invalid input: {message}")]
    InvalidInput { field: String, message: String },

    #[error("database error: {0}")]
    Db(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ForecastError {
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Wire error code for the envelope
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::Db(_) => "db_error",
            Self::Config(_) => "config_error",
        }
    }

    /// Extra context for the envelope's optional `details` field
    pub fn details(&self) -> Option<String> {
        match self {
            Self::InvalidInput { field, .. } => Some(format!("field: {field}")),
            Self::Db(source) => Some(source.to_string()),
            Self::Config(_) => None,
        }
    }
}

pub type ForecastResult<T> = Result<T, ForecastError>;
