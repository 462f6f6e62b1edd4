//! Client error types

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} for {url}")]
    Status { status: u16, url: String },

    #[error("API key is invalid or missing")]
    Unauthorized,

    #[error("Failed to parse response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error parsing config.toml: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Error writing config.toml: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
