//! Transaction request types handed to the signer.

use crate::error::RejectionContext;
use crate::provider::ContractKind;
use ayin_core::codec::{Address, Val};
use ayin_core::U256;

/// How the signer should address the contract method
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodRef {
    /// Public method by name, resolved by the wallet's contract artifacts
    Named(&'static str),
    /// Raw method index
    Index(u32),
}

/// Token attached to a call or transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTransfer {
    pub id: String,
    pub amount: U256,
}

impl TokenTransfer {
    pub fn new(id: impl Into<String>, amount: U256) -> Self {
        Self { id: id.into().to_lowercase(), amount }
    }
}

/// Script call into one contract method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCallParams {
    pub signer_address: Address,
    pub contract_address: Address,
    pub contract: ContractKind,
    pub method: MethodRef,
    pub args: Vec<Val>,
    pub atto_alph_amount: U256,
    pub tokens: Vec<TokenTransfer>,
}

impl ContractCallParams {
    /// Token approved for the call, if exactly one
    pub fn approved_token(&self) -> Option<&str> {
        match self.tokens.as_slice() {
            [single] => Some(single.id.as_str()),
            _ => None,
        }
    }
}

/// One output of a transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub address: Address,
    pub atto_alph_amount: U256,
    pub tokens: Vec<TokenTransfer>,
}

/// Plain value transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferParams {
    pub signer_address: Address,
    pub destinations: Vec<Destination>,
}

/// Kind of a submitted transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    Transfer,
    ExecuteScript,
}

/// One step of a chained submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainedStep {
    Transfer(TransferParams),
    ContractCall(ContractCallParams),
}

impl ChainedStep {
    pub fn kind(&self) -> TxKind {
        match self {
            ChainedStep::Transfer(_) => TxKind::Transfer,
            ChainedStep::ContractCall(_) => TxKind::ExecuteScript,
        }
    }
}

/// Signer acknowledgement of a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTx {
    pub tx_id: String,
    pub kind: TxKind,
}

/// Operations the orchestrator builds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Stake,
    Unstake,
    ClaimRewards,
    Swap,
    AddLiquidity,
    RemoveLiquidity,
    MintXAyin,
    BurnXAyin,
    VaultDeposit,
    VaultWithdraw,
    TopUpRewards,
    Transfer,
}

/// A contract call built but not submitted. Usable on its own or as a step
/// of a chained submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    pub operation: Operation,
    pub params: ContractCallParams,
    /// Token the contract pays out from its own balance during the call
    pub payout_token: Option<String>,
}

impl BuildResult {
    pub fn new(operation: Operation, params: ContractCallParams) -> Self {
        Self { operation, params, payout_token: None }
    }

    pub fn with_payout_token(mut self, token_id: impl Into<String>) -> Self {
        self.payout_token = Some(token_id.into());
        self
    }

    /// Same call with a different ALPH attachment
    pub fn with_atto_alph(mut self, amount: U256) -> Self {
        self.params.atto_alph_amount = amount;
        self
    }

    pub fn into_step(self) -> ChainedStep {
        ChainedStep::ContractCall(self.params)
    }

    pub fn rejection_context(&self) -> RejectionContext<'_> {
        RejectionContext {
            contract_address: Some(self.params.contract_address.as_str()),
            token_id: self.params.approved_token().or(self.payout_token.as_deref()),
        }
    }
}
