//! Typed errors for the content client and configuration

use thiserror::Error;

/// Failure while talking to the content host
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Request to content host failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Content host answered {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Malformed response from content host: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Invalid or incomplete site configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing content project id (set content.project_id or SANITY_PROJECT_ID)")]
    MissingProjectId,

    #[error("Invalid content project id: {0:?}")]
    InvalidProjectId(String),

    #[error("Invalid dataset name: {0:?}")]
    InvalidDataset(String),

    #[error("Unknown timezone: {0:?}")]
    InvalidTimezone(String),
}
