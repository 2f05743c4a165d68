mod models;

use crate::client::config::Settings;
use crate::common::{expiry_after, Credentials};
use crate::error::AuthError;
use chrono::Utc;
pub use models::{DeviceCode, PollOutcome};
use models::*;
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub const SCOPE: &str = "https://www.googleapis.com/auth/cloudprint";
pub const GRANT_DEVICE: &str = "http://oauth.net/grant_type/device/1.0";
pub const GRANT_REFRESH: &str = "refresh_token";

/// Floor for the polling interval, whatever the provider asks for
const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Added to the interval each time the provider answers `slow_down`
const SLOW_DOWN_STEP: Duration = Duration::from_secs(5);

/// OAuth2 device-flow client for the print provider.
///
/// Every call is a single form-encoded POST; only [`wait_for_token`] loops.
///
/// [`wait_for_token`]: DeviceFlowClient::wait_for_token
pub struct DeviceFlowClient {
    http_client: Client,
    device_code_url: String,
    token_url: String,
}

impl DeviceFlowClient {
    pub fn new(settings: &Settings) -> Result<Self, AuthError> {
        let http_client = Client::builder()
            .timeout(settings.http_timeout())
            .build()?;

        Ok(Self {
            http_client,
            device_code_url: settings.device_code_url.clone(),
            token_url: settings.token_url.clone(),
        })
    }

    /// Ask the provider for a device and user code.
    pub async fn request_code(&self, credentials: &Credentials) -> Result<DeviceCode, AuthError> {
        let (client_id, _) = require_client(credentials)?;

        let resp = self
            .http_client
            .post(&self.device_code_url)
            .form(&[("client_id", client_id), ("scope", SCOPE)])
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(AuthError::Protocol { status, body });
        }

        let data = resp.json::<DeviceCodeResponse>().await?;
        let expires_at = expiry_after(Utc::now(), data.expires_in)?;

        tracing::debug!(
            "Received device code, expires_at: {}, interval: {}s",
            expires_at,
            data.interval
        );

        Ok(DeviceCode {
            device_code: data.device_code,
            user_code: data.user_code,
            verification_url: data.verification_url,
            expires_at,
            interval: Duration::from_secs(data.interval),
        })
    }

    /// Exchange the device code for tokens. A pending answer leaves
    /// `credentials` untouched.
    pub async fn poll_token(
        &self,
        code: &DeviceCode,
        credentials: &mut Credentials,
    ) -> Result<PollOutcome, AuthError> {
        let (client_id, client_secret) = require_client(credentials)?;

        let response = self
            .post_token(&[
                ("code", code.device_code.as_str()),
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("grant_type", GRANT_DEVICE),
            ])
            .await?;

        match response {
            TokenResponse::Error { error } => Ok(PollOutcome::Pending(error)),
            TokenResponse::Grant(grant) => {
                credentials.apply_grant(grant, Utc::now())?;
                tracing::info!(
                    "Device authorized, token expires_at: {:?}",
                    credentials.expires_at()
                );
                Ok(PollOutcome::Authorized)
            }
        }
    }

    /// Trade the refresh token for a new access token. Client id, secret and
    /// (unless a new one is issued) the refresh token are kept.
    pub async fn refresh_token(&self, credentials: &mut Credentials) -> Result<(), AuthError> {
        let (client_id, client_secret) = require_client(credentials)?;
        let refresh_token = credentials
            .refresh_token()
            .ok_or(AuthError::NotAuthenticated)?;

        let response = self
            .post_token(&[
                ("refresh_token", refresh_token),
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("grant_type", GRANT_REFRESH),
            ])
            .await?;

        match response {
            TokenResponse::Error { error } => {
                tracing::warn!("Token refresh rejected: {}", error);
                Err(AuthError::Denied(error))
            }
            TokenResponse::Grant(grant) => {
                credentials.apply_grant(grant, Utc::now())?;
                tracing::info!("Refreshed token, expires_at: {:?}", credentials.expires_at());
                Ok(())
            }
        }
    }

    /// Poll until the user authorizes the device, sleeping `code.interval`
    /// (at least one second) between attempts and backing off on
    /// `slow_down`. Fails with [`AuthError::Timeout`] once the device code
    /// has expired; transport errors are returned immediately.
    pub async fn wait_for_token(
        &self,
        code: &DeviceCode,
        credentials: &mut Credentials,
    ) -> Result<(), AuthError> {
        let mut interval = code.interval.max(MIN_POLL_INTERVAL);

        loop {
            if code.is_expired_at(Utc::now()) {
                return Err(AuthError::Timeout);
            }

            match self.poll_token(code, credentials).await? {
                PollOutcome::Authorized => return Ok(()),
                PollOutcome::Pending(reason) => {
                    if reason == "slow_down" {
                        interval += SLOW_DOWN_STEP;
                    }
                    tracing::debug!(
                        "Authorization pending ({}), retrying in {}s",
                        reason,
                        interval.as_secs()
                    );
                    tokio::time::sleep(interval).await;
                }
            }
        }
    }

    async fn post_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, AuthError> {
        let resp = self
            .http_client
            .post(&self.token_url)
            .form(form)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;

        // Error answers arrive with 4xx statuses but still carry a JSON body
        match serde_json::from_str::<TokenResponse>(&body) {
            Ok(response) => Ok(response),
            Err(_) if !status.is_success() => Err(AuthError::Protocol { status, body }),
            Err(e) => Err(e.into()),
        }
    }
}

fn require_client(credentials: &Credentials) -> Result<(&str, &str), AuthError> {
    credentials.client().ok_or_else(|| {
        AuthError::Configuration("Client ID or secret is not set".to_string())
    })
}
