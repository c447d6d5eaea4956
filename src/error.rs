use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Jenkins API error: {0}")]
    Jenkins(String),

    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    #[error("Chat transport error: {0}")]
    Chat(String),

    #[error("Marker store error: {0}")]
    Store(String),

    #[error("Provider call timed out after {0:?}")]
    Timeout(Duration),

    /// The build list could not be fetched while no marker exists yet.
    /// Only the current cycle is aborted; the next one retries bootstrap.
    #[error("Bootstrap build list fetch failed: {0}")]
    BootstrapListFetch(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<octocrab::Error> for AppError {
    fn from(e: octocrab::Error) -> Self {
        AppError::GitHubApi(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
