use anyhow::Context;
use sale_core::{config::Config, io, paths};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let path = paths::config_path(root);
    let body = Config::default()
        .to_yaml()
        .context("failed to serialize config")?;
    let data = format!("# rainsale project configuration\n{body}");
    let written = io::write_if_missing(&path, data.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;

    if written {
        println!("Created {}", path.display());
        println!("Set 'factory' and 'wallet.url' before running 'rainsale deploy'.");
    } else {
        println!("{} already exists; left unchanged.", path.display());
    }
    Ok(())
}
