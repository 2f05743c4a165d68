use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::AuthError;

pub const DEVICE_CODE_URL: &str = "https://accounts.google.com/o/oauth2/device/code";
pub const TOKEN_URL: &str = "https://accounts.google.com/o/oauth2/token";
pub const SERVICE_URL: &str = "https://www.google.com/cloudprint";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,
    #[serde(default = "default_device_code_url")]
    pub device_code_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_service_url")]
    pub service_url: String,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_credentials_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".cloudprint"))
        .unwrap_or_else(|| PathBuf::from(".cloudprint"))
}

fn default_device_code_url() -> String {
    DEVICE_CODE_URL.to_string()
}

fn default_token_url() -> String {
    TOKEN_URL.to_string()
}

fn default_service_url() -> String {
    SERVICE_URL.to_string()
}

fn default_http_timeout_secs() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credentials_path: default_credentials_path(),
            device_code_url: default_device_code_url(),
            token_url: default_token_url(),
            service_url: default_service_url(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl Settings {
    /// Optional `config.toml` (or `$CLOUDPRINT_CONFIG`) overlaid by
    /// `CLOUDPRINT__*` environment variables.
    pub fn new() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("CLOUDPRINT_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        Self::build(File::with_name(&config_path).required(false))
    }

    /// Like [`Settings::new`] but the file must exist.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::build(File::from(path).required(true))
    }

    fn build<T>(file: T) -> Result<Self, ConfigError>
    where
        T: config::Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("CLOUDPRINT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), AuthError> {
        for (name, url) in [
            ("device_code_url", &self.device_code_url),
            ("token_url", &self.token_url),
            ("service_url", &self.service_url),
        ] {
            if url.is_empty() {
                return Err(AuthError::Configuration(format!("{} is required", name)));
            }
            if !url.starts_with("http") {
                return Err(AuthError::Configuration(format!(
                    "{} must be a valid HTTP(S) URL",
                    name
                )));
            }
        }
        if self.http_timeout_secs == 0 {
            return Err(AuthError::Configuration(
                "http_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_point_at_provider() {
        let settings = Settings::default();
        assert_eq!(settings.device_code_url, DEVICE_CODE_URL);
        assert_eq!(settings.token_url, TOKEN_URL);
        assert_eq!(settings.http_timeout(), Duration::from_secs(30));
        assert!(settings.credentials_path.ends_with(".cloudprint"));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_from_file_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "service_url = \"http://localhost:9000\"\nhttp_timeout_secs = 5\ncredentials_path = \"/tmp/creds\""
        )
        .unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.service_url, "http://localhost:9000");
        assert_eq!(settings.http_timeout_secs, 5);
        assert_eq!(settings.credentials_path, PathBuf::from("/tmp/creds"));
        assert_eq!(settings.token_url, TOKEN_URL);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        assert!(Settings::from_file(Path::new("/nonexistent/cloudprint.toml")).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.token_url = "ftp://example.com".to_string();
        assert!(matches!(
            settings.validate(),
            Err(AuthError::Configuration(_))
        ));

        let mut settings = Settings::default();
        settings.http_timeout_secs = 0;
        assert!(settings.validate().is_err());
    }
}
