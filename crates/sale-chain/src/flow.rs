use std::time::Duration;

use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use sale_core::sale::{RedeemableConfig, SaleConfig, SaleParams};
use tracing::info;

use crate::factory::{Deployment, SaleFactory};
use crate::wallet::request_accounts;
use crate::{ChainError, Result};

// ─── DeployRequest ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub factory: Option<Address>,
    pub params: SaleParams,
    /// When set, read the deployed sale's price for this many units.
    pub price_units: Option<U256>,
    pub receipt_timeout: Duration,
}

// ─── DeployOutcome ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DeployOutcome {
    pub account: Address,
    pub chain_id: u64,
    /// Chain head the start and end blocks were computed from.
    pub current_block: u64,
    pub factory: Address,
    pub sale: SaleConfig,
    pub redeemable: RedeemableConfig,
    pub deployment: Deployment,
    pub price: Option<U256>,
}

/// Connected account plus the records built for it, before anything is sent.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub account: Address,
    pub chain_id: u64,
    pub current_block: u64,
    pub sale: SaleConfig,
    pub redeemable: RedeemableConfig,
}

/// Request account access and build both records for the first account.
pub async fn prepare<P: Provider>(provider: &P, params: &SaleParams) -> Result<Prepared> {
    let account = request_accounts(provider)
        .await?
        .into_iter()
        .next()
        .ok_or(ChainError::NoAccounts)?;
    let chain_id = provider.get_chain_id().await?;
    let current_block = provider.get_block_number().await?;
    info!(%account, chain_id, current_block, "wallet connected");

    let (sale, redeemable) = params.build(account, current_block)?;
    Ok(Prepared {
        account,
        chain_id,
        current_block,
        sale,
        redeemable,
    })
}

/// The deploy step: connect, build, deploy, and optionally read a price.
pub async fn deploy_flow<P: Provider>(
    provider: &P,
    request: &DeployRequest,
) -> Result<DeployOutcome> {
    let factory_addr = request
        .factory
        .filter(|f| *f != Address::ZERO)
        .ok_or(ChainError::MissingFactory)?;

    let prepared = prepare(provider, &request.params).await?;
    let factory = SaleFactory::new(factory_addr).with_receipt_timeout(request.receipt_timeout);
    let deployment = factory
        .deploy(provider, prepared.account, &prepared.sale, &prepared.redeemable)
        .await?;

    let price = match request.price_units {
        Some(units) => Some(
            deployment
                .sale
                .calculate_price(provider, prepared.account, units)
                .await?,
        ),
        None => None,
    };

    Ok(DeployOutcome {
        account: prepared.account,
        chain_id: prepared.chain_id,
        current_block: prepared.current_block,
        factory: factory_addr,
        sale: prepared.sale,
        redeemable: prepared.redeemable,
        deployment,
        price,
    })
}

// ─── Tests ────────────────────────────────────────────────────────────────
