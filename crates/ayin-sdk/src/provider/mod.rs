//! Node and signer interfaces
//!
//! The SDK never talks to a wallet directly and only reaches the network
//! through `NodeProvider`. `HttpNodeProvider` is the production
//! implementation; tests substitute in-memory ones.

pub mod http;

pub use http::HttpNodeProvider;

use crate::error::SdkResult;
use crate::orchestrator::params::{ChainedStep, ContractCallParams, SubmittedTx, TransferParams};
use async_trait::async_trait;
use ayin_core::codec::{Address, RawValue, Val};
use ayin_core::{FieldPosition, Protocol, U256};
use serde::{Deserialize, Serialize};

// ============================================================================
// Node Types
// ============================================================================

/// Contract kinds the SDK calls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractKind {
    TokenPair,
    StakingV2,
    StakingV4,
    StakingAccount,
    LiquidStaking,
    Vault,
}

impl ContractKind {
    pub const ALL: [ContractKind; 6] = [
        ContractKind::TokenPair,
        ContractKind::StakingV2,
        ContractKind::StakingV4,
        ContractKind::StakingAccount,
        ContractKind::LiquidStaking,
        ContractKind::Vault,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractKind::TokenPair => "token_pair",
            ContractKind::StakingV2 => "staking_v2",
            ContractKind::StakingV4 => "staking_v4",
            ContractKind::StakingAccount => "staking_account",
            ContractKind::LiquidStaking => "liquid_staking",
            ContractKind::Vault => "vault",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// View methods the SDK calls on this kind of contract. Each needs an
    /// entry in the configured method table.
    pub fn view_methods(&self) -> &'static [&'static str] {
        match self {
            ContractKind::StakingV2 => &["getStakingAccount", "earned", "getTokenId"],
            ContractKind::StakingV4 => &["getStakingAccount", "earned", "calculateRewardPerToken", "getTokenId"],
            ContractKind::StakingAccount => &["getStaker", "getAmountStaked", "getRewards", "getRewardPerTokenPaid"],
            ContractKind::TokenPair | ContractKind::LiquidStaking | ContractKind::Vault => &[],
        }
    }

    /// Parent contract kind for a resolved protocol
    pub fn from_protocol(protocol: Protocol) -> Self {
        match protocol {
            Protocol::PoolV1 => ContractKind::TokenPair,
            Protocol::StakingV2 => ContractKind::StakingV2,
            Protocol::StakingV4 => ContractKind::StakingV4,
        }
    }
}

/// On-chain state of a contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractState {
    pub address: String,
    pub code_hash: String,
    #[serde(default)]
    pub imm_fields: Vec<Val>,
    #[serde(default)]
    pub mut_fields: Vec<Val>,
}

impl ContractState {
    /// Mutable field `index` as an integer
    pub fn mut_u256(&self, index: usize) -> Option<U256> {
        self.mut_fields.get(index).and_then(Val::as_u256)
    }

    pub fn field(&self, position: FieldPosition) -> Option<&Val> {
        let fields = if position.mutable { &self.mut_fields } else { &self.imm_fields };
        fields.get(position.index)
    }

    /// Address stored at `position`, if that field holds one
    pub fn address_at(&self, position: FieldPosition) -> Option<&str> {
        self.field(position).and_then(Val::as_address)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBalance {
    pub id: String,
    pub amount: U256,
}

/// ALPH and token balances of an address
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressBalance {
    pub balance: U256,
    pub tokens: Vec<TokenBalance>,
}

impl AddressBalance {
    pub fn token(&self, id: &str) -> U256 {
        self.tokens
            .iter()
            .find(|t| t.id.eq_ignore_ascii_case(id))
            .map(|t| t.amount)
            .unwrap_or(U256::ZERO)
    }
}

/// Input of a transaction as reported by the explorer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub unlock_script: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransactionInfo {
    pub hash: String,
    pub inputs: Vec<TransactionInput>,
}

/// Read-only contract method call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewCall {
    pub address: Address,
    pub contract: ContractKind,
    pub method: &'static str,
    pub args: Vec<Val>,
}

impl ViewCall {
    pub fn new(address: Address, contract: ContractKind, method: &'static str) -> Self {
        Self { address, contract, method, args: Vec::new() }
    }

    pub fn with_args(mut self, args: Vec<Val>) -> Self {
        self.args = args;
        self
    }
}

// ============================================================================
// Provider Traits
// ============================================================================

/// Read access to the node and explorer
#[async_trait]
pub trait NodeProvider: Send + Sync {
    async fn contract_state(&self, address: &Address) -> SdkResult<ContractState>;

    async fn address_balance(&self, address: &Address) -> SdkResult<AddressBalance>;

    /// Execute a view method without submitting anything
    async fn call_view(&self, call: ViewCall) -> SdkResult<RawValue>;

    /// Public key from a direct index lookup; `None` when the index has none
    async fn public_key(&self, address: &Address) -> SdkResult<Option<String>>;

    /// Hashes of the most recent transactions touching `address`
    async fn recent_transactions(&self, address: &Address, limit: usize) -> SdkResult<Vec<String>>;

    async fn transaction(&self, hash: &str) -> SdkResult<TransactionInfo>;
}

/// Account exposed by a wallet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub address: Address,
    pub public_key: String,
}

/// External wallet that signs and submits
#[async_trait]
pub trait SignerProvider: Send + Sync {
    async fn selected_account(&self) -> SdkResult<Account>;

    async fn sign_and_submit_transfer(&self, params: TransferParams) -> SdkResult<SubmittedTx>;

    async fn sign_and_submit_contract_call(&self, params: ContractCallParams) -> SdkResult<SubmittedTx>;

    /// Sign and submit all steps as one unit; one result per step, in order
    async fn sign_and_submit_chained(&self, steps: Vec<ChainedStep>) -> SdkResult<Vec<SubmittedTx>>;

    /// Signature over an unsigned transaction
    async fn sign_raw(&self, signer_address: &Address, unsigned_tx: &str) -> SdkResult<String>;

    async fn submit_signed(&self, unsigned_tx: &str, signature: &str) -> SdkResult<SubmittedTx>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_kind_names() {
        for kind in ContractKind::ALL {
            assert_eq!(ContractKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ContractKind::parse("router"), None);
        assert_eq!(ContractKind::from_protocol(Protocol::StakingV2), ContractKind::StakingV2);
    }

    #[test]
    fn test_contract_state_fields() {
        let state: ContractState = serde_json::from_value(serde_json::json!({
            "address": "tuuAwnJNwxew6chSHV74CW9Er18EE925Ss2fQMmZbWtF",
            "codeHash": "ab",
            "immFields": [{"type": "Address", "value": "owner-imm"}],
            "mutFields": [
                {"type": "U256", "value": "10"},
                {"type": "Address", "value": "owner-mut"}
            ]
        }))
        .unwrap();
        assert_eq!(state.mut_u256(0), Some(U256::new(10)));
        assert_eq!(state.mut_u256(1), None);
        assert_eq!(state.address_at(FieldPosition::mutable(1)), Some("owner-mut"));
        assert_eq!(state.address_at(FieldPosition::immutable(0)), Some("owner-imm"));
        assert_eq!(state.address_at(FieldPosition::mutable(0)), None);
        assert_eq!(state.address_at(FieldPosition::mutable(2)), None);
    }

    #[test]
    fn test_token_balance_lookup_ignores_case() {
        let balance = AddressBalance {
            balance: U256::ONE,
            tokens: vec![TokenBalance { id: "AB".into(), amount: U256::new(3) }],
        };
        assert_eq!(balance.token("ab"), U256::new(3));
        assert_eq!(balance.token("cd"), U256::ZERO);
    }
}
