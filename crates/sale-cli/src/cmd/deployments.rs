use crate::output::{print_json, print_table};
use anyhow::Context;
use sale_core::deployment::DeploymentRecord;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let records = DeploymentRecord::list(root).context("failed to read deployments")?;

    if json {
        return print_json(&records);
    }

    if records.is_empty() {
        println!("No deployments recorded.");
        return Ok(());
    }

    let rows = records
        .iter()
        .map(|r| {
            vec![
                r.address.to_string(),
                r.redeemable.erc20.symbol.clone(),
                r.chain_id.to_string(),
                r.block_number.to_string(),
                r.deployed_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            ]
        })
        .collect();
    print_table(&["ADDRESS", "TOKEN", "CHAIN", "BLOCK", "DEPLOYED"], rows);
    Ok(())
}
