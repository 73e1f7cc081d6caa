use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use tracing::{debug, info};

use crate::{ChainError, Result};

/// Detect the wallet provider. Without a URL there is nothing to talk to, so
/// this fails before any provider is built or request is made.
///
/// The endpoint is a wallet's JSON-RPC interface, e.g. a desktop wallet's
/// local RPC or a development node with unlocked accounts. Signing happens
/// inside the wallet.
pub fn connect(url: Option<&str>) -> Result<impl Provider> {
    let url = url
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(ChainError::NoWallet)?;
    let parsed = url
        .parse::<reqwest::Url>()
        .map_err(|e| ChainError::InvalidWalletUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
    debug!(url, "using wallet provider");
    Ok(ProviderBuilder::new()
        .disable_recommended_fillers()
        .connect_http(parsed))
}

/// Ask the wallet for account access (`eth_requestAccounts`).
pub async fn request_accounts<P: Provider>(provider: &P) -> Result<Vec<Address>> {
    let accounts: Vec<Address> = provider
        .raw_request("eth_requestAccounts".into(), ())
        .await?;
    info!(count = accounts.len(), "wallet accounts granted");
    Ok(accounts)
}
