use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

use crate::common::TokenGrant;
use crate::error::AuthError;

/// Device-code request in flight for one login attempt
#[derive(Debug, Clone)]
pub struct DeviceCode {
    pub device_code: String,
    pub user_code: String,
    pub verification_url: String,
    pub expires_at: DateTime<Utc>,
    pub interval: Duration,
}

impl DeviceCode {
    pub fn is_expired_at(&self, when: DateTime<Utc>) -> bool {
        self.expires_at < when
    }
}

/// Result of one poll of the token endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Tokens were stored on the credentials
    Authorized,
    /// The provider answered with an `error` (usually `authorization_pending`);
    /// poll again after the interval
    Pending(String),
}

impl PollOutcome {
    pub fn into_result(self) -> Result<(), AuthError> {
        match self {
            Self::Authorized => Ok(()),
            Self::Pending(error) => Err(AuthError::Denied(error)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct DeviceCodeResponse {
    pub device_code: String,
    pub user_code: String,
    #[serde(alias = "verification_uri")]
    pub verification_url: String,
    pub expires_in: i64,
    pub interval: u64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum TokenResponse {
    Error { error: String },
    Grant(TokenGrant),
}
