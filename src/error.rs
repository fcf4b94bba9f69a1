use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    /// The request for the result document could not complete.
    #[error("{0}")]
    Transport(String),

    /// The response body was not valid JSON. Carries the body text (or a
    /// fallback message when the body was empty).
    #[error("{0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    #[error("Unsupported shell: {0}. Supported shells: bash, zsh, fish")]
    UnsupportedShell(String),

    #[error("Challenge failed: {failed} of {total} tests failed")]
    ChallengeFailed { failed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, DashError>;
