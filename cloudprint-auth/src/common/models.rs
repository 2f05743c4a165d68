use chrono::{serde::ts_seconds_option, DateTime, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AuthError;

/// `now + seconds`, cut to whole seconds so it survives the stored format.
/// Fails when the provider sends a lifetime chrono cannot represent.
pub fn expiry_after(now: DateTime<Utc>, seconds: i64) -> Result<DateTime<Utc>, AuthError> {
    TimeDelta::try_seconds(seconds)
        .and_then(|delta| now.checked_add_signed(delta))
        .map(|expires_at| expires_at.trunc_subsecs(0))
        .ok_or_else(|| {
            AuthError::InvalidResponse(format!("expires_in out of range: {}", seconds))
        })
}

/// Successful body of the token endpoint, for both device and refresh grants
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
}

/// Where a credential set sits in the login lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unconfigured,
    Configured,
    Authenticated,
    Expired,
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconfigured => f.write_str("unconfigured"),
            Self::Configured => f.write_str("configured"),
            Self::Authenticated => f.write_str("authenticated"),
            Self::Expired => f.write_str("expired"),
        }
    }
}

/// Persisted client credentials and tokens.
///
/// The client id and secret are only ever set as a pair, and an access token
/// only arrives through a [`TokenGrant`], which always carries an expiry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(
        default,
        with = "ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    expires_at: Option<DateTime<Utc>>,
}

impl Credentials {
    pub fn with_client(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        let mut credentials = Self::default();
        credentials.set_client(client_id, client_secret);
        credentials
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn token_type(&self) -> Option<&str> {
        self.token_type.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Both halves of the client pair, if configured
    pub fn client(&self) -> Option<(&str, &str)> {
        Some((self.client_id.as_deref()?, self.client_secret.as_deref()?))
    }

    pub fn set_client(&mut self, client_id: impl Into<String>, client_secret: impl Into<String>) {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(client_secret.into());
    }

    /// Store the tokens from a grant. A grant without a refresh token keeps
    /// the one already held. Nothing changes if the lifetime is out of range.
    pub fn apply_grant(
        &mut self,
        grant: TokenGrant,
        now: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let expires_at = expiry_after(now, grant.expires_in)?;
        self.access_token = Some(grant.access_token);
        self.token_type = Some(grant.token_type);
        if let Some(refresh_token) = grant.refresh_token {
            self.refresh_token = Some(refresh_token);
        }
        self.expires_at = Some(expires_at);
        Ok(())
    }

    pub fn clear_tokens(&mut self) {
        self.access_token = None;
        self.token_type = None;
        self.refresh_token = None;
        self.expires_at = None;
    }

    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    /// Client pair and access token are present. Expiry is not considered.
    pub fn is_authenticated(&self) -> bool {
        self.client().is_some() && self.access_token.is_some()
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// A missing expiry never expires; `expires_at == when` is still valid.
    pub fn is_expired_at(&self, when: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < when)
    }

    pub fn state_at(&self, when: DateTime<Utc>) -> AuthState {
        if self.client().is_none() {
            AuthState::Unconfigured
        } else if self.access_token.is_none() {
            AuthState::Configured
        } else if self.is_expired_at(when) {
            AuthState::Expired
        } else {
            AuthState::Authenticated
        }
    }

    pub fn state(&self) -> AuthState {
        self.state_at(Utc::now())
    }
}
