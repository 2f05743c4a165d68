use crate::common::Credentials;
use crate::error::AuthError;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Persistence for a single [`Credentials`] record.
///
/// There is no locking: two processes saving at once race and the last write
/// wins.
pub trait CredentialStore {
    /// Load the stored record. A store that was never written is empty.
    fn load(&self) -> Result<Credentials, AuthError>;

    /// Overwrite the whole stored record.
    fn save(&self, credentials: &Credentials) -> Result<(), AuthError>;

    /// Load, failing unless the client id and secret are both present.
    fn load_required(&self) -> Result<Credentials, AuthError> {
        let credentials = self.load()?;
        if credentials.client().is_none() {
            return Err(AuthError::Configuration(
                "Client ID or secret is not set, run `cloudprint auth setcreds` first".to_string(),
            ));
        }
        Ok(credentials)
    }

    /// Drop the tokens but keep the client id and secret.
    fn clear_tokens(&self) -> Result<(), AuthError> {
        let mut credentials = self.load()?;
        credentials.clear_tokens();
        self.save(&credentials)
    }

    /// Reset every field. The backing record itself is kept.
    fn clear_all(&self) -> Result<(), AuthError> {
        self.save(&Credentials::default())
    }
}

/// JSON file store, `~/.cloudprint` by default
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Credentials, AuthError> {
        if !self.path.exists() {
            return Ok(Credentials::default());
        }

        let json = fs::read_to_string(&self.path).map_err(|e| {
            AuthError::Configuration(format!(
                "Failed to read credentials from {}: {}",
                self.path.display(),
                e
            ))
        })?;

        if json.trim().is_empty() {
            return Ok(Credentials::default());
        }

        serde_json::from_str(&json).map_err(|e| {
            AuthError::Configuration(format!(
                "Invalid credentials file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn save(&self, credentials: &Credentials) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    AuthError::Storage(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(credentials)?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // Owner read/write only, from the moment the file exists
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&self.path)
            .map_err(|e| AuthError::Storage(format!("Failed to save credentials: {}", e)))?;

        // `mode` only applies on creation, so tighten a file that predates it
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|e| {
                    AuthError::Storage(format!("Failed to set file permissions: {}", e))
                })?;
        }

        file.write_all(json.as_bytes())
            .map_err(|e| AuthError::Storage(format!("Failed to save credentials: {}", e)))?;

        tracing::debug!("Saved credentials to {}", self.path.display());
        Ok(())
    }
}

/// In-process store, mostly for tests and embedding
#[derive(Default)]
pub struct MemoryCredentialStore {
    credentials: Mutex<Credentials>,
}

impl MemoryCredentialStore {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials: Mutex::new(credentials),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Credentials, AuthError> {
        self.credentials
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| AuthError::Storage("Credential lock poisoned".to_string()))
    }

    fn save(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let mut guard = self
            .credentials
            .lock()
            .map_err(|_| AuthError::Storage("Credential lock poisoned".to_string()))?;
        *guard = credentials.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::TokenGrant;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn authenticated() -> Credentials {
        let mut credentials = Credentials::with_client("client_id", "client_secret");
        credentials.apply_grant(
            TokenGrant {
                access_token: "access_token".to_string(),
                token_type: "Bearer".to_string(),
                refresh_token: Some("refresh_token".to_string()),
                expires_in: 3600,
            },
            Utc::now(),
        )
        .unwrap();
        credentials
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join(".cloudprint"));
        assert_eq!(store.load().unwrap(), Credentials::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested").join(".cloudprint"));
        let credentials = authenticated();

        store.save(&credentials).unwrap();
        assert_eq!(store.load().unwrap(), credentials);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join(".cloudprint"));
        store.save(&authenticated()).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_tightens_existing_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".cloudprint");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let store = FileCredentialStore::new(&path);
        let credentials = authenticated();
        store.save(&credentials).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().unwrap(), credentials);
    }

    #[test]
    fn test_corrupt_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".cloudprint");
        fs::write(&path, "not json").unwrap();

        let store = FileCredentialStore::new(path);
        assert!(matches!(store.load(), Err(AuthError::Configuration(_))));
    }

    #[test]
    fn test_load_required_needs_client_pair() {
        let store = MemoryCredentialStore::default();
        assert!(matches!(
            store.load_required(),
            Err(AuthError::Configuration(_))
        ));

        store
            .save(&Credentials::with_client("client_id", "client_secret"))
            .unwrap();
        assert!(store.load_required().is_ok());
    }

    #[test]
    fn test_clear_tokens_keeps_client() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join(".cloudprint"));
        store.save(&authenticated()).unwrap();

        store.clear_tokens().unwrap();

        assert_eq!(
            store.load().unwrap(),
            Credentials::with_client("client_id", "client_secret")
        );
    }

    #[test]
    fn test_clear_all_keeps_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join(".cloudprint"));
        store.save(&authenticated()).unwrap();

        store.clear_all().unwrap();

        assert!(store.path().exists());
        assert_eq!(store.load().unwrap(), Credentials::default());
    }
}
