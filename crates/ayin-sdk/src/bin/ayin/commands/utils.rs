// Utility functions for CLI commands

use anyhow::{Context, Result};
use ayin_sdk::ayin_core::codec::{format_units, Address, ContractId};
use ayin_sdk::ayin_core::{U256, DEFAULT_DECIMALS};
use ayin_sdk::{HttpNodeProvider, NodeProvider, SdkConfig};
use std::sync::Arc;

/// Parse a base58 address
pub fn parse_address(s: &str) -> Result<Address> {
    Address::parse(s).with_context(|| format!("Invalid address: {}", s))
}

/// Parse a 64-hex token id
pub fn parse_token(s: &str) -> Result<ContractId> {
    ContractId::from_hex(s).with_context(|| format!("Invalid token id: {}", s))
}

/// HTTP node provider for the loaded configuration
pub fn node(config: &Arc<SdkConfig>) -> Result<Arc<dyn NodeProvider>> {
    Ok(Arc::new(HttpNodeProvider::new(config.clone())?))
}

/// 18-decimal display of a raw amount
pub fn units(amount: U256) -> String {
    format_units(amount, DEFAULT_DECIMALS)
}

/// Print info message
pub fn info(msg: &str) {
    println!("[INFO] {}", msg);
}

/// Print warning message
pub fn warn(msg: &str) {
    eprintln!("[WARN] {}", msg);
}
