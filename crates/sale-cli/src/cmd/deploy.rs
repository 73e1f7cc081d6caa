use crate::output::{print_fields, print_json};
use alloy_primitives::Address;
use anyhow::Context;
use sale_chain::{deploy_flow, prepare, DeployRequest};
use sale_core::{
    config::Config,
    deployment::DeploymentRecord,
    sale::{parse_amount, TOKEN_DECIMALS},
};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub struct DeployArgs {
    pub wallet_url: Option<String>,
    pub factory: Option<String>,
    pub price_units: Option<String>,
    pub dry_run: bool,
}

pub fn run(root: &Path, args: DeployArgs, json: bool) -> anyhow::Result<()> {
    let config = Config::load_or_default(root).context("failed to load config")?;

    // No wallet means no network traffic at all.
    let wallet_url = args.wallet_url.or_else(|| config.wallet.url.clone());
    let wallet = sale_chain::connect(wallet_url.as_deref()).context("failed to connect wallet")?;

    let factory = match args.factory.as_deref() {
        Some(f) => Some(
            f.parse::<Address>()
                .with_context(|| format!("invalid factory address '{f}'"))?,
        ),
        None => config.factory,
    };
    let price_units = args
        .price_units
        .as_deref()
        .map(|u| parse_amount(u, TOKEN_DECIMALS))
        .transpose()
        .context("invalid --price-units")?;

    let rt = tokio::runtime::Runtime::new()?;

    if args.dry_run {
        let prepared = rt
            .block_on(prepare(&wallet, &config.sale))
            .context("failed to prepare deployment")?;
        if json {
            return print_json(&serde_json::json!({
                "account": prepared.account,
                "chain_id": prepared.chain_id,
                "current_block": prepared.current_block,
                "sale": prepared.sale,
                "redeemable": prepared.redeemable,
            }));
        }
        println!(
            "Dry run: account {} on chain {} at block {}",
            prepared.account, prepared.chain_id, prepared.current_block
        );
        println!();
        return super::plan::print_records(&prepared.sale, &prepared.redeemable);
    }

    let request = DeployRequest {
        factory,
        params: config.sale.clone(),
        price_units,
        receipt_timeout: Duration::from_secs(config.wallet.receipt_timeout_secs),
    };
    let outcome = rt
        .block_on(deploy_flow(&wallet, &request))
        .context("deployment failed")?;

    let record = DeploymentRecord {
        address: outcome.deployment.sale.address(),
        factory: outcome.factory,
        deployer: outcome.account,
        tx_hash: outcome.deployment.tx_hash,
        chain_id: outcome.chain_id,
        block_number: outcome.deployment.block_number,
        deployed_at: chrono::Utc::now(),
        sale: outcome.sale.clone(),
        redeemable: outcome.redeemable.clone(),
    };
    record
        .save(root)
        .context("sale deployed but the deployment record could not be written")?;
    info!(sale = %record.address, "deployment recorded");

    if json {
        return print_json(&serde_json::json!({
            "address": record.address,
            "tx_hash": record.tx_hash,
            "block_number": record.block_number,
            "chain_id": record.chain_id,
            "recipient": record.sale.recipient,
            "price": outcome.price,
        }));
    }

    let mut rows = vec![
        ("Sale", record.address.to_string()),
        ("Token", record.redeemable.erc20.symbol.clone()),
        ("Recipient", record.sale.recipient.to_string()),
        ("Transaction", record.tx_hash.to_string()),
        ("Block", record.block_number.to_string()),
    ];
    if let (Some(units), Some(price)) = (price_units, outcome.price) {
        rows.push(("Price", format!("{price} for {units} units")));
    }
    print_fields(&rows);
    Ok(())
}
