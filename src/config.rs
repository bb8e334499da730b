//! Configuration loading.
//!
//! [`LabstockConfig::load`] reads `config/config.toml` when present and
//! layers environment variables prefixed with `LABSTOCK` on top, using `__`
//! as the section separator (`LABSTOCK__API__BASE_URL`).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "config/config.toml";
const ENV_PREFIX: &str = "LABSTOCK";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabstockConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Where the inventory REST API lives and how to reach it
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Bearer token attached to every request
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_recent_transactions")]
    pub recent_transactions: usize,
    #[serde(default = "default_expiring_soon_days")]
    pub expiring_soon_days: i64,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_base_url() -> String {
    "https://localhost:8081".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_recent_transactions() -> usize {
    crate::dashboard::DEFAULT_RECENT_TRANSACTIONS
}

fn default_expiring_soon_days() -> i64 {
    30
}

fn default_page_size() -> usize {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            token: None,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_transactions: default_recent_transactions(),
            expiring_soon_days: default_expiring_soon_days(),
            page_size: default_page_size(),
        }
    }
}

impl LabstockConfig {
    /// Load from `config/config.toml`, falling back to env vars.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if neither the file nor the environment yields
    /// a valid configuration.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false))
            .add_source(env_source());

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                // A file that exists but cannot be read or parsed is worth a warning
                if Path::new(DEFAULT_CONFIG_FILE).exists() {
                    log::warn!(
                        "Failed to load {}, falling back to env: {}",
                        DEFAULT_CONFIG_FILE,
                        err
                    );
                }
                Config::builder()
                    .add_source(env_source())
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {}, then env-only error: {}",
                            err, env_err
                        ))
                    })?
            }
        };

        Self::from_settings(settings)
    }

    /// Load from an explicit file, with env vars layered on top.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable or invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(File::from(path).required(true))
            .add_source(env_source())
            .build()?;
        log::debug!("Loaded configuration from {}", path.display());
        Self::from_settings(settings)
    }

    fn from_settings(settings: Config) -> Result<Self, ConfigError> {
        settings.try_deserialize::<LabstockConfig>().map_err(|e| {
            ConfigError::Message(format!(
                "Labstock configuration could not be loaded from file or environment: {}",
                e
            ))
        })
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = LabstockConfig::default();
        assert_eq!(config.api.base_url, "https://localhost:8081");
        assert_eq!(config.api.timeout_seconds, 30);
        assert!(config.api.token.is_none());
        assert_eq!(config.dashboard.recent_transactions, 5);
        assert_eq!(config.dashboard.expiring_soon_days, 30);
        assert_eq!(config.dashboard.page_size, 10);
    }

    #[test]
    fn test_from_file_with_partial_sections() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://inventory.internal:9000\"\ntoken = \"abc\"\n\n[dashboard]\npage_size = 25"
        )
        .unwrap();

        let config = LabstockConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api.base_url, "http://inventory.internal:9000");
        assert_eq!(config.api.token.as_deref(), Some("abc"));
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.dashboard.page_size, 25);
        assert_eq!(config.dashboard.recent_transactions, 5);
    }

    #[test]
    fn test_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = LabstockConfig::from_file(dir.path().join("absent.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_value_is_reported() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[dashboard]\npage_size = \"many\"").unwrap();
        assert!(LabstockConfig::from_file(file.path()).is_err());
    }
}
