// Credentials and token state
pub mod common;

// Device flow, credential persistence and settings
mod client;
mod error;

pub use client::{
    auth_client, authorize, login, CredentialStore, DeviceCode, DeviceFlowClient,
    FileCredentialStore, MemoryCredentialStore, PollOutcome, Settings, DEVICE_CODE_URL,
    SERVICE_URL, TOKEN_URL,
};
pub use common::{AuthState, Credentials, TokenGrant};
pub use error::AuthError;
