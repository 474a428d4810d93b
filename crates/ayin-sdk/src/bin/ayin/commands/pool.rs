// Pool inspection command

use anyhow::{Context, Result};
use ayin_sdk::ayin_core::codec::parse_units;
use ayin_sdk::ayin_core::math::min_amount_out;
use ayin_sdk::ayin_core::{Registry, DEFAULT_DECIMALS};
use ayin_sdk::{PoolReader, SdkConfig};
use clap::Args;
use std::sync::Arc;

use super::utils::{node, parse_address, parse_token, units};

#[derive(Args)]
pub struct PoolCmd {
    /// Pair contract address
    address: String,

    /// Token0 id of the pair
    #[arg(long)]
    token0: String,

    /// Token1 id of the pair
    #[arg(long)]
    token1: String,

    /// Whole-token amount of token0 to quote a sale for
    #[arg(long)]
    amount_in: Option<String>,
}

pub async fn execute(cmd: PoolCmd, config: Arc<SdkConfig>) -> Result<()> {
    let pair = parse_address(&cmd.address)?;
    let token0 = parse_token(&cmd.token0)?;
    let token1 = parse_token(&cmd.token1)?;

    let registry: Arc<Registry> = Arc::new(config.build_registry()?);
    let reader = PoolReader::new(node(&config)?, registry);
    let state = reader.fetch_pair_state(&pair, token0, token1).await?;

    println!("pair:         {}", pair);
    println!("reserve0:     {}", units(state.reserves.reserve0));
    println!("reserve1:     {}", units(state.reserves.reserve1));
    println!("totalSupply:  {}", units(state.reserves.total_supply));

    if let Some(amount) = cmd.amount_in {
        let amount_in = parse_units(&amount, DEFAULT_DECIMALS).with_context(|| format!("Invalid amount: {}", amount))?;
        let out = state.quote_exact_in(&token0, amount_in)?;
        let min_out = min_amount_out(out, config.slippage_bps)?;
        println!("amountIn:     {}", units(amount_in));
        println!("amountOut:    {}", units(out));
        println!("minAmountOut: {} ({} bps slippage)", units(min_out), config.slippage_bps);
    }
    Ok(())
}
