mod models;

pub use models::{expiry_after, AuthState, Credentials, TokenGrant};
