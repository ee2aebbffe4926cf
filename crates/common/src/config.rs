//! Configuration types for hayashi.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration for a hayashi node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Network configuration.
    pub network: NetworkConfig,

    /// Whitelist configuration.
    #[serde(default)]
    pub whitelist: WhitelistConfig,
}

/// Network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network passphrase; the network id is its hash.
    pub passphrase: String,
}

/// Whitelist configuration.
///
/// The whitelist grants priority inclusion during surge pricing. A fraction
/// of every transaction set's capacity stays reserved for transactions that
/// are not whitelisted, so the whitelist can never starve the open network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhitelistConfig {
    /// Hex-encoded account ids with priority inclusion.
    #[serde(default)]
    pub accounts: Vec<String>,

    /// Hex-encoded holder account with absolute top priority, if any.
    #[serde(default)]
    pub holder: Option<String>,

    /// Percentage of each transaction set reserved for non-whitelisted
    /// transactions (0-100).
    #[serde(default = "default_reserve_percent")]
    pub reserve_percent: u32,
}

impl Default for WhitelistConfig {
    fn default() -> Self {
        Self {
            accounts: Vec::new(),
            holder: None,
            reserve_percent: default_reserve_percent(),
        }
    }
}

fn default_reserve_percent() -> u32 {
    20
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Create a default devnet configuration.
    pub fn devnet() -> Self {
        Self {
            network: NetworkConfig {
                passphrase: "hayashi development network ; March 2026".to_string(),
            },
            whitelist: WhitelistConfig::default(),
        }
    }
}
