mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rainsale",
    about = "Query token sales from the subgraph and deploy new ones through the sale factory",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .rainsale/ or .git/)
    #[arg(long, global = true, env = "RAINSALE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default .rainsale/config.yaml
    Init,

    /// Fetch a sale from the subgraph and print a summary
    Query {
        /// Sale contract address (default: subgraph.sale_id from config)
        sale_id: Option<String>,

        /// Subgraph GraphQL endpoint
        #[arg(long, env = "RAINSALE_SUBGRAPH_URL")]
        endpoint: Option<String>,

        /// Also append the summary to this HTML file
        #[arg(long)]
        html: Option<PathBuf>,

        /// Element id to append into
        #[arg(long, default_value = "data", requires = "html")]
        element: String,
    },

    /// Build the sale and token records without touching the network
    Plan {
        /// Recipient of the raised reserve (default: zero address)
        #[arg(long)]
        recipient: Option<String>,

        /// Chain head to compute start and end blocks from
        #[arg(long, default_value_t = 0)]
        current_block: u64,
    },

    /// Connect the wallet and deploy a sale through the factory
    Deploy {
        /// Wallet JSON-RPC endpoint
        #[arg(long, env = "RAINSALE_WALLET_URL")]
        wallet_url: Option<String>,

        /// Sale factory address (overrides config)
        #[arg(long)]
        factory: Option<String>,

        /// After deploying, read the price for this many tokens
        #[arg(long)]
        price_units: Option<String>,

        /// Connect and build the records, but do not send the transaction
        #[arg(long)]
        dry_run: bool,
    },

    /// List sales deployed from this project
    Deployments,

    /// Inspect and validate the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Init => "init",
            Commands::Query { .. } => "query",
            Commands::Plan { .. } => "plan",
            Commands::Deploy { .. } => "deploy",
            Commands::Deployments => "deployments",
            Commands::Config { .. } => "config",
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Deploy { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root_path = cli.root.as_deref();
    let root = root::resolve_root(root_path);
    let command = cli.command.name();

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Query {
            sale_id,
            endpoint,
            html,
            element,
        } => cmd::query::run(
            &root,
            cmd::query::QueryArgs {
                sale_id,
                endpoint,
                html,
                element,
            },
            cli.json,
        ),
        Commands::Plan {
            recipient,
            current_block,
        } => cmd::plan::run(&root, recipient.as_deref(), current_block, cli.json),
        Commands::Deploy {
            wallet_url,
            factory,
            price_units,
            dry_run,
        } => cmd::deploy::run(
            &root,
            cmd::deploy::DeployArgs {
                wallet_url,
                factory,
                price_units,
                dry_run,
            },
            cli.json,
        ),
        Commands::Deployments => cmd::deployments::run(&root, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        tracing::error!(command, "operation failed");
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
