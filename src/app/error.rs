use reqwest::StatusCode;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum CaptionFeedError {
    #[error("Upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Upstream returned {0}")]
    UpstreamStatus(StatusCode),

    #[error("Failed to read upstream response: {0}")]
    BodyRead(#[source] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    Parse(String),

    #[error("Feed serialization error: {0}")]
    Serialize(String),

    #[error("Failed to decode cached feed: {0}")]
    CacheCorruption(String),

    #[error("Cache store error: {0}")]
    Cache(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<rusqlite::Error> for CaptionFeedError {
    fn from(e: rusqlite::Error) -> Self {
        CaptionFeedError::Cache(e.to_string())
    }
}

impl From<ConfigError> for CaptionFeedError {
    fn from(e: ConfigError) -> Self {
        CaptionFeedError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CaptionFeedError>;
