use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The provider answered with an `error` field.
    #[error("Authorization denied: {0}")]
    Denied(String),

    /// A well-formed answer carrying values that cannot be used.
    #[error("Invalid response from authorization server: {0}")]
    InvalidResponse(String),

    #[error("Unexpected response from authorization server ({status}): {body}")]
    Protocol { status: StatusCode, body: String },

    #[error("Device code expired before authorization completed")]
    Timeout,

    #[error("Not authenticated, run `cloudprint auth login` first")]
    NotAuthenticated,

    #[error("Credential storage error: {0}")]
    Storage(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<config::ConfigError> for AuthError {
    fn from(err: config::ConfigError) -> Self {
        AuthError::Configuration(err.to_string())
    }
}
