use crate::error::Result;
use crate::paths;
use crate::sale::{RedeemableConfig, SaleConfig};
use alloy_primitives::{Address, B256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A sale deployed from this project, kept under `.rainsale/deployments/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub address: Address,
    pub factory: Address,
    pub deployer: Address,
    pub tx_hash: B256,
    pub chain_id: u64,
    pub block_number: u64,
    pub deployed_at: DateTime<Utc>,
    pub sale: SaleConfig,
    pub redeemable: RedeemableConfig,
}

impl DeploymentRecord {
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::deployment_path(root, &alloy_primitives::hex::encode(self.address));
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// All recorded deployments, oldest first.
    pub fn list(root: &Path) -> Result<Vec<DeploymentRecord>> {
        let dir = paths::deployments_dir(root);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut records = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "yaml") {
                let data = std::fs::read_to_string(&path)?;
                records.push(serde_yaml::from_str::<DeploymentRecord>(&data)?);
            }
        }
        records.sort_by_key(|r| r.deployed_at);
        Ok(records)
    }
}
