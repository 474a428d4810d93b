// Public key resolution command

use anyhow::{bail, Result};
use ayin_sdk::{KeyResolver, SdkConfig};
use clap::Args;
use std::sync::Arc;

use super::utils::{node, parse_address};

#[derive(Args)]
pub struct PublicKeyCmd {
    /// Wallet address
    address: String,
}

pub async fn execute(cmd: PublicKeyCmd, config: Arc<SdkConfig>) -> Result<()> {
    let address = parse_address(&cmd.address)?;
    match KeyResolver::new(node(&config)?).resolve_public_key(&address).await {
        Some(key) => {
            println!("{}", key);
            Ok(())
        }
        None => bail!("No verifiable public key found for {}", address),
    }
}
