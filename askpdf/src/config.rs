use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::error::{AskPdfError, Result};

pub const DEFAULT_CHATPDF_BASE_URL: &str = "https://api.chatpdf.com/v1";

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn non_empty_env(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory uploaded PDFs are written to. Relative paths resolve
    /// against the working directory.
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

/// Settings for the ChatPDF-compatible document QA provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 32 * 1024 * 1024,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_CHATPDF_BASE_URL.to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let storage_defaults = StorageConfig::default();
        let provider_defaults = ProviderConfig::default();

        Self {
            server: ServerConfig {
                host: env::var("ASKPDF_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("PORT", 5000),
            },
            storage: StorageConfig {
                upload_dir: non_empty_env("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(storage_defaults.upload_dir),
                max_upload_bytes: parse_env_or(
                    "MAX_UPLOAD_BYTES",
                    storage_defaults.max_upload_bytes,
                ),
            },
            provider: ProviderConfig {
                api_key: non_empty_env("CHATPDF_API_KEY"),
                base_url: non_empty_env("CHATPDF_BASE_URL")
                    .unwrap_or(provider_defaults.base_url),
                timeout_secs: parse_env_or("CHATPDF_TIMEOUT", provider_defaults.timeout_secs),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Checks the settings the server cannot start without.
    pub fn validate(&self) -> Result<()> {
        if self.provider.api_key.is_none() {
            return Err(AskPdfError::Config(
                "CHATPDF_API_KEY is not set; the document QA provider requires an API key"
                    .to_string(),
            ));
        }

        url::Url::parse(&self.provider.base_url).map_err(|e| {
            AskPdfError::Config(format!(
                "CHATPDF_BASE_URL '{}' is not a valid URL: {e}",
                self.provider.base_url
            ))
        })?;

        if self.storage.max_upload_bytes == 0 {
            return Err(AskPdfError::Config(
                "MAX_UPLOAD_BYTES must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
