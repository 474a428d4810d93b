// Staking position commands

use anyhow::{Context, Result};
use ayin_sdk::ayin_core::codec::Address;
use ayin_sdk::ayin_core::U256;
use ayin_sdk::config::StakingDeployment;
use ayin_sdk::{KeyResolver, NodeProvider, SdkConfig, StakingAccountant};
use clap::Args;
use futures::future::join_all;
use std::sync::Arc;

use super::utils::{info, node, parse_address, units, warn};

#[derive(Args)]
pub struct StakingListCmd {
    /// File with one wallet or StakingAccount address per line
    file: String,

    /// Only this staking deployment key (e.g. usdt_alph)
    #[arg(long)]
    pool: Option<String>,
}

#[derive(Args)]
pub struct StakingCmd {
    /// Wallet or StakingAccount address
    address: String,

    /// Only this staking deployment key (e.g. usdt_alph)
    #[arg(long)]
    pool: Option<String>,
}

/// One row of output
struct Position {
    label: String,
    staked: U256,
    earned: U256,
    stored: U256,
    reward_to_paid: U256,
}

fn deployments<'a>(config: &'a SdkConfig, key: Option<&str>) -> Result<Vec<&'a StakingDeployment>> {
    match key {
        Some(key) => {
            let deployment = config
                .staking_by_key(key)
                .with_context(|| format!("Unknown staking deployment: {}", key))?;
            Ok(vec![deployment])
        }
        None => Ok(config.staking.iter().collect()),
    }
}

async fn position(accountant: &StakingAccountant, deployment: &StakingDeployment, staker: &Address) -> Result<Position> {
    let contract = parse_address(&deployment.address)?;
    let protocol = deployment.protocol;
    let (staked, earned, stored, reward_to_paid) = futures::join!(
        accountant.staked_balance(&contract, protocol, staker),
        accountant.earned_reward(&contract, protocol, staker),
        accountant.stored_rewards(&contract, protocol, staker),
        accountant.reward_to_paid(&contract, protocol, staker),
    );
    Ok(Position { label: deployment.label.clone(), staked, earned, stored, reward_to_paid })
}

async fn report(
    node: Arc<dyn NodeProvider>,
    config: &SdkConfig,
    address: &Address,
    deployments: &[&StakingDeployment],
) -> Result<()> {
    let staker = KeyResolver::new(node.clone()).resolve_staker(address).await;
    if staker != *address {
        info(&format!("{} is the staking account of {}", address, staker));
    }

    let accountant = StakingAccountant::from_config(node, config)?;
    let positions = join_all(deployments.iter().map(|d| position(&accountant, d, &staker))).await;

    let mut shown = 0;
    for position in positions {
        let position = position?;
        if position.staked == U256::ZERO && position.earned == U256::ZERO {
            continue;
        }
        shown += 1;
        println!(
            "{}\t{}\tstaked={}\tearned={}\tstored={}\trewardToPaid={}",
            staker,
            position.label,
            units(position.staked),
            units(position.earned),
            units(position.stored),
            units(position.reward_to_paid),
        );
    }
    if shown == 0 {
        info(&format!("{}: no staking positions", staker));
    }
    Ok(())
}

pub async fn execute(cmd: StakingCmd, config: Arc<SdkConfig>) -> Result<()> {
    let address = parse_address(&cmd.address)?;
    let deployments = deployments(&config, cmd.pool.as_deref())?;
    report(node(&config)?, &config, &address, &deployments).await
}

pub async fn execute_list(cmd: StakingListCmd, config: Arc<SdkConfig>) -> Result<()> {
    let content = std::fs::read_to_string(&cmd.file).with_context(|| format!("Failed to read {}", cmd.file))?;
    let deployments = deployments(&config, cmd.pool.as_deref())?;
    let node = node(&config)?;

    for line in content.lines().map(str::trim).filter(|l| !l.is_empty() && !l.starts_with('#')) {
        match parse_address(line) {
            Ok(address) => report(node.clone(), &config, &address, &deployments).await?,
            Err(e) => warn(&format!("skipping line {:?}: {}", line, e)),
        }
    }
    Ok(())
}
