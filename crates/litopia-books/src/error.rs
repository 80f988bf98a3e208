use litopia_core::LitopiaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error from {0}: {1}")]
    ApiError(String, String),

    #[error("rate limit from {0}, retry after {1}s")]
    RateLimit(String, u64),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("volume not found: {0}")]
    NotFound(String),
}

impl From<SourceError> for LitopiaError {
    fn from(e: SourceError) -> Self {
        LitopiaError::Network(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;
