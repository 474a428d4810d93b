// CLI tool for Ayin
//
// Read-only inspection of pools, staking positions and public keys against
// an Alephium node and explorer backend.

mod commands;

use anyhow::Result;
use ayin_sdk::SdkConfig;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ayin")]
#[command(about = "Ayin DEX CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (mainnet preset when omitted)
    #[arg(short, long)]
    config: Option<String>,

    /// Node URL override
    #[arg(long)]
    node_url: Option<String>,

    /// Explorer backend URL override
    #[arg(long)]
    backend_url: Option<String>,

    /// Override log filter
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Staking positions for every address listed in a file
    StakingList(commands::staking::StakingListCmd),

    /// Staking positions of one address
    Staking(commands::staking::StakingCmd),

    /// Pool reserves and an exact-in quote
    Pool(commands::pool::PoolCmd),

    /// Resolve the public key behind an address
    PublicKey(commands::keys::PublicKeyCmd),
}

fn init_logging(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => tracing_subscriber::EnvFilter::new(format!("ayin_sdk={},ayin={}", level, level)),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "ayin_sdk=info,ayin=info".into()),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<SdkConfig> {
    let mut config = match &cli.config {
        Some(path) => SdkConfig::load(path)?,
        None => SdkConfig::mainnet(),
    }
    .with_env_overrides();

    if let Some(url) = &cli.node_url {
        config = config.with_node_url(url.clone());
    }
    if let Some(url) = &cli.backend_url {
        config = config.with_backend_url(url.clone());
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let config = Arc::new(load_config(&cli)?);
    tracing::debug!(node = %config.node_url, backend = %config.backend_url, "configuration loaded");

    match cli.command {
        Commands::StakingList(cmd) => commands::staking::execute_list(cmd, config).await,
        Commands::Staking(cmd) => commands::staking::execute(cmd, config).await,
        Commands::Pool(cmd) => commands::pool::execute(cmd, config).await,
        Commands::PublicKey(cmd) => commands::keys::execute(cmd, config).await,
    }
}
