use crate::output::{print_fields, print_json};
use alloy_primitives::Address;
use anyhow::Context;
use sale_core::{
    config::Config,
    opcode::StateConfig,
    sale::{RedeemableConfig, SaleConfig},
};
use std::path::Path;

pub fn run(
    root: &Path,
    recipient: Option<&str>,
    current_block: u64,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load_or_default(root).context("failed to load config")?;
    let recipient = match recipient {
        Some(r) => r
            .parse::<Address>()
            .with_context(|| format!("invalid recipient address '{r}'"))?,
        None => Address::ZERO,
    };

    let (sale, redeemable) = config
        .sale
        .build(recipient, current_block)
        .context("failed to build sale records")?;

    if json {
        return print_json(&serde_json::json!({
            "sale": sale,
            "redeemable": redeemable,
        }));
    }
    print_records(&sale, &redeemable)
}

/// Human-readable view of both records, programs disassembled.
pub fn print_records(sale: &SaleConfig, redeemable: &RedeemableConfig) -> anyhow::Result<()> {
    println!("Sale");
    print_fields(&[
        ("  recipient", sale.recipient.to_string()),
        ("  reserve", sale.reserve.to_string()),
        ("  sale timeout", format!("{} blocks", sale.sale_timeout)),
        ("  cooldown", format!("{} blocks", sale.cooldown_duration)),
        ("  minimum raise", sale.minimum_raise.to_string()),
        ("  dust size", sale.dust_size.to_string()),
        ("  can start", program(&sale.can_start)?),
        ("  can end", program(&sale.can_end)?),
        ("  price", program(&sale.calculate_price)?),
    ]);
    println!();
    println!("Token");
    print_fields(&[
        ("  name", redeemable.erc20.name.clone()),
        ("  symbol", redeemable.erc20.symbol.clone()),
        ("  distributor", redeemable.erc20.distributor.to_string()),
        ("  initial supply", redeemable.erc20.initial_supply.to_string()),
        ("  tier", redeemable.tier.to_string()),
        ("  minimum tier", redeemable.minimum_tier.to_string()),
        (
            "  forward unsold to",
            redeemable.distribution_end_forwarding_address.to_string(),
        ),
    ]);
    Ok(())
}

fn program(cfg: &StateConfig) -> anyhow::Result<String> {
    let sources = cfg.disassemble().context("failed to disassemble program")?;
    let ops: Vec<String> = sources
        .iter()
        .map(|ops| {
            ops.iter()
                .map(|o| o.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect();
    let constants: Vec<String> = cfg.constants.iter().map(|c| c.to_string()).collect();
    Ok(format!(
        "[{}] constants [{}]",
        ops.join(" | "),
        constants.join(", ")
    ))
}
