use crate::error::{Result, SaleError};
use crate::paths;
use crate::sale::SaleParams;
use crate::subgraph::{DEFAULT_ENDPOINT, DEFAULT_SALE_ID};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// SubgraphConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubgraphConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_sale_id")]
    pub sale_id: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_sale_id() -> String {
    DEFAULT_SALE_ID.to_string()
}

impl Default for SubgraphConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            sale_id: default_sale_id(),
        }
    }
}

// ---------------------------------------------------------------------------
// WalletConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalletConfig {
    /// JSON-RPC endpoint of the wallet that signs transactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// How long to wait for a deployment transaction to be mined.
    #[serde(default = "default_receipt_timeout")]
    pub receipt_timeout_secs: u64,
}

fn default_receipt_timeout() -> u64 {
    120
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            url: None,
            receipt_timeout_secs: default_receipt_timeout(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub subgraph: SubgraphConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
    /// Sale factory contract the deployment goes through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory: Option<Address>,
    #[serde(default)]
    pub sale: SaleParams,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            subgraph: SubgraphConfig::default(),
            wallet: WalletConfig::default(),
            factory: None,
            sale: SaleParams::default(),
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(SaleError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Load the project config, falling back to defaults when the project
    /// has not been initialized.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        match Self::load(root) {
            Err(SaleError::NotInitialized) => Ok(Self::default()),
            other => other,
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        crate::io::atomic_write(&path, self.to_yaml()?.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        // 1. Subgraph endpoint must be an http(s) URL
        let endpoint = self.subgraph.endpoint.trim();
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("subgraph.endpoint '{endpoint}' is not an http(s) URL"),
            });
        }

        // 2. Deploy needs a factory and a wallet
        if self.factory.is_none_or(|f| f == Address::ZERO) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "factory is not set; 'rainsale deploy' will fail".to_string(),
            });
        }
        if self.wallet.url.as_deref().is_none_or(|u| u.trim().is_empty()) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "wallet.url is not set; pass --wallet-url or RAINSALE_WALLET_URL to deploy"
                    .to_string(),
            });
        }
        if self.wallet.receipt_timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "wallet.receipt_timeout_secs must be at least 1".to_string(),
            });
        }

        // 3. Sale parameters must build into valid records
        if let Err(e) = self.sale.build(Address::repeat_byte(0x11), 0) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("sale: {e}"),
            });
        }

        // 4. Zero forwarding address burns unsold tokens
        if self.sale.forwarding_address == Address::ZERO {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "sale.forwarding_address is the zero address; unsold tokens will be burned"
                    .to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
