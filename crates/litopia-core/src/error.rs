use thiserror::Error;

/// All errors that can occur in litopia-core.
#[derive(Debug, Error)]
pub enum LitopiaError {
    /// Non-success response or transport failure while fetching books.
    #[error("Network error: {0}")]
    Network(String),

    /// Stored data is malformed or the store is inaccessible.
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl LitopiaError {
    /// Whether the failure came from the remote book API.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Exit codes used by the CLI.
#[repr(i32)]
pub enum ExitCode {
    InvalidArgs = 3,
    NetworkError = 6,
    Conflict = 7,
}

pub type Result<T> = std::result::Result<T, LitopiaError>;
