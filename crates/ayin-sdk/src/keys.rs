//! Address and public key resolution
//!
//! A wallet address only commits to the hash of its key. The key is looked up
//! in the explorer's index first and otherwise recovered from the unlock
//! script of the address's latest transaction. Every candidate is checked by
//! rederiving the address from it.

use crate::error::SdkResult;
use crate::provider::{ContractKind, NodeProvider, ViewCall};
use ayin_core::codec::{Address, AddressKind, PublicKey};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct KeyResolver {
    node: Arc<dyn NodeProvider>,
}

impl KeyResolver {
    pub fn new(node: Arc<dyn NodeProvider>) -> Self {
        Self { node }
    }

    /// Public key behind a P2PKH address, if one can be found and verified
    pub async fn resolve_public_key(&self, address: &Address) -> Option<PublicKey> {
        if address.kind() != AddressKind::P2PKH {
            debug!(address = %address, kind = ?address.kind(), "address carries no single public key");
            return None;
        }

        match self.node.public_key(address).await {
            Ok(Some(hex)) => match PublicKey::from_hex(hex.trim()) {
                Ok(key) if key.to_p2pkh_address() == *address => return Some(key),
                Ok(_) => debug!(address = %address, "indexed public key does not match address"),
                Err(e) => debug!(address = %address, error = %e, "indexed public key malformed"),
            },
            Ok(None) => debug!(address = %address, "public key not indexed"),
            Err(e) => debug!(address = %address, error = %e, "public key lookup failed"),
        }

        match self.key_from_latest_transaction(address).await {
            Ok(key) => key,
            Err(e) => {
                debug!(address = %address, error = %e, "transaction lookup failed");
                None
            }
        }
    }

    async fn key_from_latest_transaction(&self, address: &Address) -> SdkResult<Option<PublicKey>> {
        let hashes = self.node.recent_transactions(address, 1).await?;
        let Some(hash) = hashes.first() else {
            debug!(address = %address, "address has no transactions");
            return Ok(None);
        };

        let tx = self.node.transaction(hash).await?;
        let key = tx
            .inputs
            .iter()
            .filter(|input| input.address.as_deref() == Some(address.as_str()))
            .filter_map(|input| input.unlock_script.as_deref())
            .filter_map(PublicKey::from_unlock_script)
            .find(|key| key.to_p2pkh_address() == *address);

        if key.is_none() {
            debug!(address = %address, tx = %hash, "no input of the latest transaction unlocks with a matching key");
        }
        Ok(key)
    }

    /// Staker behind a StakingAccount contract address; any other address is
    /// returned unchanged
    pub async fn resolve_staker(&self, address: &Address) -> Address {
        if !address.is_contract() {
            return address.clone();
        }

        let call = ViewCall::new(address.clone(), ContractKind::StakingAccount, "getStaker");
        match self.node.call_view(call).await {
            Ok(raw) => match raw.first().as_text().map(Address::parse) {
                Some(Ok(staker)) => staker,
                _ => {
                    debug!(address = %address, returned = ?raw, "getStaker returned no address");
                    address.clone()
                }
            },
            Err(e) => {
                debug!(address = %address, error = %e, "not a staking account");
                address.clone()
            }
        }
    }
}
