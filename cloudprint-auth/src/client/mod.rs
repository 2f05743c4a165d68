pub mod auth_client;
mod config;
mod credential_store;

pub use auth_client::{DeviceCode, DeviceFlowClient, PollOutcome};
pub use config::{Settings, DEVICE_CODE_URL, SERVICE_URL, TOKEN_URL};
pub use credential_store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};

use crate::common::Credentials;
use crate::error::AuthError;

/// Run the whole device flow against `store`: load the client pair, request a
/// code, hand it to `present` for display, poll until authorized, then save.
///
/// An error from `present` stops the flow before any polling.
pub async fn login<S, F, E>(
    client: &DeviceFlowClient,
    store: &S,
    present: F,
) -> Result<Credentials, E>
where
    S: CredentialStore + ?Sized,
    F: FnOnce(&DeviceCode) -> Result<(), E>,
    E: From<AuthError>,
{
    let mut credentials = store.load_required()?;

    let code = client.request_code(&credentials).await?;
    present(&code)?;

    client.wait_for_token(&code, &mut credentials).await?;

    store.save(&credentials)?;
    tracing::info!("Login complete");

    Ok(credentials)
}

/// Load credentials that can call the print service, refreshing and saving
/// them first if the access token has expired.
pub async fn authorize<S>(client: &DeviceFlowClient, store: &S) -> Result<Credentials, AuthError>
where
    S: CredentialStore + ?Sized,
{
    let mut credentials = store.load_required()?;

    if !credentials.is_authenticated() {
        return Err(AuthError::NotAuthenticated);
    }

    if credentials.is_expired() {
        tracing::info!("Access token expired, refreshing");
        client.refresh_token(&mut credentials).await?;
        store.save(&credentials)?;
    }

    Ok(credentials)
}
