//! Configuration module for bookpay-bridge.
//!
//! Handles loading configuration from the TOML file and CLI overrides, and
//! turns it into the core's runtime types.

pub mod file;

use crate::config::file::{ChannelConfig, FileConfig};
use bookpay_core::config::{AmountConfig, ChannelPolicy};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Backend connection settings.
#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: Url,
    pub access_token: Option<String>,
    pub timeout: Duration,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub listen: SocketAddr,
    pub backend: BackendSettings,
    pub channel: ChannelPolicy,
    pub amount: AmountConfig,
    pub storage_path: PathBuf,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Read, apply CLI overrides, validate and convert.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        validate(&file_config)?;
        Ok(build_loaded_config(file_config))
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    let scheme = config.channel.scheme.trim();
    if scheme.is_empty() {
        return Err(ConfigError::ValidationError(
            "channel.scheme must not be empty".to_string(),
        ));
    }
    if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") {
        return Err(ConfigError::ValidationError(format!(
            "channel.scheme cannot be {scheme}"
        )));
    }
    if config.channel.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "channel.poll_interval_ms must be positive".to_string(),
        ));
    }
    if config.wallet.presets.is_empty() {
        return Err(ConfigError::ValidationError(
            "wallet.presets must list at least one amount".to_string(),
        ));
    }
    if let Some(zero) = config.wallet.presets.iter().position(|p| *p == 0) {
        return Err(ConfigError::ValidationError(format!(
            "wallet.presets[{zero}] must be positive"
        )));
    }
    if !matches!(config.backend.base_url.scheme(), "http" | "https") {
        return Err(ConfigError::ValidationError(
            "backend.base_url must be http or https".to_string(),
        ));
    }
    Ok(())
}

fn build_loaded_config(file_config: FileConfig) -> LoadedConfig {
    let backend_domain = file_config.backend.base_url.host_str().map(str::to_string);
    LoadedConfig {
        listen: file_config.server.listen,
        channel: convert_channel(file_config.channel, backend_domain),
        backend: BackendSettings {
            base_url: file_config.backend.base_url,
            access_token: file_config.backend.access_token,
            timeout: Duration::from_secs(file_config.backend.timeout_secs),
        },
        amount: AmountConfig {
            presets: file_config.wallet.presets,
            group_separator: file_config.wallet.group_separator,
        },
        storage_path: file_config.storage.path,
    }
}

fn convert_channel(c: ChannelConfig, backend_domain: Option<String>) -> ChannelPolicy {
    let defaults = ChannelPolicy::default();
    ChannelPolicy {
        scheme: c.scheme.trim().to_string(),
        provider_domains: c.provider_domains,
        backend_domain,
        enforce_allow_list: c.enforce_allow_list,
        poll_interval: Duration::from_millis(c.poll_interval_ms),
        success_markers: if c.success_markers.is_empty() {
            defaults.success_markers
        } else {
            c.success_markers
        },
        error_markers: if c.error_markers.is_empty() {
            defaults.error_markers
        } else {
            c.error_markers
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("bookpay-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    const BASE: &str = r#"
[backend]
base_url = "https://api.workhub.vn/api/"
"#;

    #[test]
    fn test_load_derives_backend_domain_and_override() {
        let path = write_config(BASE);
        let listen: SocketAddr = "127.0.0.1:9999".parse().unwrap();
        let loaded = ConfigLoader::new(&path, Some(listen)).load().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.listen, listen);
        assert_eq!(loaded.channel.backend_domain.as_deref(), Some("api.workhub.vn"));
        assert_eq!(loaded.channel.poll_interval, Duration::from_secs(1));
        assert_eq!(
            loaded.channel.success_markers,
            ChannelPolicy::default().success_markers
        );
        assert_eq!(loaded.amount, AmountConfig::default());
        assert_eq!(loaded.backend.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        for extra in [
            "[channel]\nscheme = \"https\"\n",
            "[channel]\nscheme = \"  \"\n",
            "[channel]\npoll_interval_ms = 0\n",
            "[wallet]\npresets = []\n",
            "[wallet]\npresets = [10000, 0]\n",
        ] {
            let path = write_config(&format!("{BASE}\n{extra}"));
            let result = ConfigLoader::new(&path, None).load();
            std::fs::remove_file(&path).unwrap();
            assert!(
                matches!(result, Err(ConfigError::ValidationError(_))),
                "{extra}"
            );
        }
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigLoader::new("/nonexistent/bookpay.toml", None).load();
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
