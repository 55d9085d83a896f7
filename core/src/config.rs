//! Adapter options, persisted as JSON.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::network::Scope;

/// Chain id Binance's deep link carries when none is configured.
pub const DEFAULT_BINANCE_DEEPLINK_CHAIN_ID: u64 = 14;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AdapterConfig {
    /// Open the wallet's website when no provider and no deep link applies.
    pub open_url_when_wallet_not_found: bool,
    /// On mobile, reopen the page in the wallet app when no provider exists.
    pub open_app_with_deeplink: bool,
    /// Scope MetaMask sessions are created for.
    pub default_scope: Scope,
    pub binance_deeplink_chain_id: u64,
    /// QR module size in pixels.
    pub qr_cell_size: u16,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            open_url_when_wallet_not_found: true,
            open_app_with_deeplink: true,
            default_scope: Scope::Mainnet,
            binance_deeplink_chain_id: DEFAULT_BINANCE_DEEPLINK_CHAIN_ID,
            qr_cell_size: 6,
        }
    }
}

impl AdapterConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config {}", path.display()))
            }
        };
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config {}", path.display()))
    }

    /// `~/.config/tronwallet-adapter/config.json` on Linux,
    /// `~/Library/Application Support/tronwallet-adapter/config.json` on macOS.
    pub fn default_path() -> anyhow::Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join("tronwallet-adapter")
            .join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AdapterConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, AdapterConfig::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"defaultScope":"tron:3448148188","openAppWithDeeplink":false}"#)
            .unwrap();

        let config = AdapterConfig::load(&path).unwrap();
        assert_eq!(config.default_scope, Scope::Nile);
        assert!(!config.open_app_with_deeplink);
        assert!(config.open_url_when_wallet_not_found);
        assert_eq!(config.binance_deeplink_chain_id, DEFAULT_BINANCE_DEEPLINK_CHAIN_ID);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AdapterConfig {
            qr_cell_size: 8,
            ..AdapterConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(AdapterConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ nope").unwrap();
        let err = AdapterConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
