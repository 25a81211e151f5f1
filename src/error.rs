//! Error types for the FPL transfer planner.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FplError>;

#[derive(Error, Debug)]
pub enum FplError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not found: {what}")]
    NotFound { what: String },

    #[error("upstream data source unavailable: {message}")]
    UpstreamUnavailable { message: String },

    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("expected-points calculation failed: {message}")]
    ExpectedPointsFailure { message: String },

    #[error("no MIP solver backend available: {message}")]
    SolverUnavailable { message: String },

    #[error("operation cancelled")]
    Cancelled,
}

impl FplError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        FplError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        FplError::NotFound { what: what.into() }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        FplError::UpstreamUnavailable {
            message: message.into(),
        }
    }
}
