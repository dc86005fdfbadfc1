//! TOML file configuration structures.
//!
//! These structs directly map to the `bookpay.toml` file format.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub backend: BackendConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the shell connects to. Keep this on loopback.
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8787))
}

/// Booking backend connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: Url,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Embedded checkout surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default = "default_provider_domains")]
    pub provider_domains: Vec<String>,
    #[serde(default)]
    pub enforce_allow_list: bool,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Empty means the built-in markers.
    #[serde(default)]
    pub success_markers: Vec<String>,
    #[serde(default)]
    pub error_markers: Vec<String>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            provider_domains: default_provider_domains(),
            enforce_allow_list: false,
            poll_interval_ms: default_poll_interval_ms(),
            success_markers: Vec::new(),
            error_markers: Vec::new(),
        }
    }
}

fn default_scheme() -> String {
    "mobile".to_string()
}

fn default_provider_domains() -> Vec<String> {
    vec!["pay.payos.vn".to_string()]
}

fn default_poll_interval_ms() -> u64 {
    1000
}

/// Deposit amount field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    #[serde(default = "default_presets")]
    pub presets: Vec<u64>,
    #[serde(default = "default_group_separator")]
    pub group_separator: char,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            presets: default_presets(),
            group_separator: default_group_separator(),
        }
    }
}

fn default_presets() -> Vec<u64> {
    vec![50_000, 100_000, 200_000, 500_000, 1_000_000, 2_000_000]
}

fn default_group_separator() -> char {
    '.'
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding the wallet deposit trail.
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./bookpay-state.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:3000"

[backend]
base_url = "https://api.workhub.vn/api/"
access_token = "abc"
timeout_secs = 10

[channel]
scheme = "workhub"
provider_domains = ["pay.payos.vn", "payos.vn"]
enforce_allow_list = true
poll_interval_ms = 500
success_markers = ["Paid"]

[wallet]
presets = [10000, 20000]
group_separator = ","

[storage]
path = "/tmp/state.json"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert_eq!(config.backend.access_token.as_deref(), Some("abc"));
        assert_eq!(config.channel.scheme, "workhub");
        assert!(config.channel.enforce_allow_list);
        assert_eq!(config.channel.success_markers, vec!["Paid".to_string()]);
        assert!(config.channel.error_markers.is_empty());
        assert_eq!(config.wallet.presets, vec![10_000, 20_000]);
        assert_eq!(config.wallet.group_separator, ',');
        assert_eq!(config.storage.path, PathBuf::from("/tmp/state.json"));
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
[backend]
base_url = "https://api.workhub.vn/api/"
"#,
        )
        .unwrap();
        assert_eq!(config.server.listen, default_listen_addr());
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.channel.scheme, "mobile");
        assert_eq!(config.channel.poll_interval_ms, 1000);
        assert!(!config.channel.enforce_allow_list);
        assert_eq!(config.wallet.presets.len(), 6);
        assert_eq!(config.wallet.group_separator, '.');
    }
}
