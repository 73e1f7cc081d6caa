use crate::output::print_json;
use anyhow::Context;
use sale_core::{config::Config, report, subgraph::SubgraphClient};
use std::path::{Path, PathBuf};
use tracing::info;

pub struct QueryArgs {
    pub sale_id: Option<String>,
    pub endpoint: Option<String>,
    pub html: Option<PathBuf>,
    pub element: String,
}

pub fn run(root: &Path, args: QueryArgs, json: bool) -> anyhow::Result<()> {
    let config = Config::load_or_default(root).context("failed to load config")?;
    let endpoint = args.endpoint.unwrap_or(config.subgraph.endpoint);
    let sale_id = args.sale_id.unwrap_or(config.subgraph.sale_id);

    let client = SubgraphClient::new(&endpoint).context("failed to build HTTP client")?;
    let sale = client
        .fetch_sale(&sale_id)
        .with_context(|| format!("failed to query sale '{sale_id}' from {endpoint}"))?;
    let summary = sale.render();

    if json {
        print_json(&sale)?;
    } else {
        print!("{summary}");
    }

    if let Some(path) = args.html {
        report::append_to_element(&path, &args.element, &summary)
            .with_context(|| format!("failed to update {}", path.display()))?;
        info!(path = %path.display(), element = %args.element, "appended sale summary");
    }
    Ok(())
}
