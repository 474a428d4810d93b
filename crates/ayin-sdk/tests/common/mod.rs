//! In-memory node and signer used by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use ayin_sdk::ayin_core::codec::{Address, ContractId, RawValue, Val};
use ayin_sdk::error::{SdkError, SdkResult};
use ayin_sdk::orchestrator::{ChainedStep, ContractCallParams, SubmittedTx, TransferParams, TxKind};
use ayin_sdk::provider::{
    Account, AddressBalance, ContractState, NodeProvider, SignerProvider, TransactionInfo, ViewCall,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// Wallet address whose key is `02 || 11 * 32`
pub const WALLET: &str = "175NVpbiPG5MAK4BfcDAq7r17G87bFeNrv7997r4an2Wb";

pub fn wallet() -> Address {
    Address::parse(WALLET).unwrap()
}

/// Contract address with every id byte set to `byte`
pub fn contract(byte: u8) -> Address {
    ContractId::new([byte; 32]).to_address()
}

pub fn contract_id(byte: u8) -> ContractId {
    ContractId::new([byte; 32])
}

// ============================================================================
// Node
// ============================================================================

/// Node answering from scripted view returns and contract states
#[derive(Default)]
pub struct MockNode {
    views: Mutex<HashMap<(String, String), RawValue>>,
    states: Mutex<HashMap<String, ContractState>>,
    calls: Mutex<Vec<ViewCall>>,
}

impl MockNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, address: &Address, method: &str, value: RawValue) {
        self.views
            .lock()
            .unwrap()
            .insert((address.to_string(), method.to_string()), value);
    }

    pub fn set_state(&self, address: &Address, code_hash: &str, imm_fields: Vec<Val>, mut_fields: Vec<Val>) {
        self.states.lock().unwrap().insert(
            address.to_string(),
            ContractState { address: address.to_string(), code_hash: code_hash.to_string(), imm_fields, mut_fields },
        );
    }

    /// View calls made so far, in order
    pub fn calls(&self) -> Vec<ViewCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NodeProvider for MockNode {
    async fn contract_state(&self, address: &Address) -> SdkResult<ContractState> {
        self.states
            .lock()
            .unwrap()
            .get(address.as_str())
            .cloned()
            .ok_or_else(|| SdkError::Rpc(format!("{} not found", address)))
    }

    async fn address_balance(&self, _address: &Address) -> SdkResult<AddressBalance> {
        Ok(AddressBalance::default())
    }

    async fn call_view(&self, call: ViewCall) -> SdkResult<RawValue> {
        self.calls.lock().unwrap().push(call.clone());
        self.views
            .lock()
            .unwrap()
            .get(&(call.address.to_string(), call.method.to_string()))
            .cloned()
            .ok_or_else(|| SdkError::Rpc(format!("{}.{} failed", call.address, call.method)))
    }

    async fn public_key(&self, _address: &Address) -> SdkResult<Option<String>> {
        Ok(None)
    }

    async fn recent_transactions(&self, _address: &Address, _limit: usize) -> SdkResult<Vec<String>> {
        Ok(Vec::new())
    }

    async fn transaction(&self, hash: &str) -> SdkResult<TransactionInfo> {
        Err(SdkError::Rpc(format!("transaction {} not found", hash)))
    }
}

// ============================================================================
// Signer
// ============================================================================

/// Signer that records what it is asked to submit
pub struct MockSigner {
    account: Option<Account>,
    rejection: Mutex<Option<String>>,
    chained_kinds: Mutex<Option<Vec<TxKind>>>,
    submitted: Mutex<Vec<ChainedStep>>,
    chains: Mutex<Vec<Vec<ChainedStep>>>,
}

impl MockSigner {
    pub fn new() -> Self {
        Self {
            account: Some(Account { address: wallet(), public_key: format!("02{}", "11".repeat(32)) }),
            rejection: Mutex::new(None),
            chained_kinds: Mutex::new(None),
            submitted: Mutex::new(Vec::new()),
            chains: Mutex::new(Vec::new()),
        }
    }

    pub fn without_account() -> Self {
        Self { account: None, ..Self::new() }
    }

    /// Reject every following request with `message`
    pub fn reject_with(&self, message: impl Into<String>) {
        *self.rejection.lock().unwrap() = Some(message.into());
    }

    /// Answer chained submissions with these kinds instead of the step kinds
    pub fn answer_chained_with(&self, kinds: Vec<TxKind>) {
        *self.chained_kinds.lock().unwrap() = Some(kinds);
    }

    pub fn submitted(&self) -> Vec<ChainedStep> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn chains(&self) -> Vec<Vec<ChainedStep>> {
        self.chains.lock().unwrap().clone()
    }

    fn check_rejection(&self) -> SdkResult<()> {
        match self.rejection.lock().unwrap().clone() {
            Some(message) => Err(SdkError::Rejected(message)),
            None => Ok(()),
        }
    }

    fn record(&self, step: ChainedStep) -> SubmittedTx {
        let mut submitted = self.submitted.lock().unwrap();
        let tx = SubmittedTx { tx_id: format!("tx-{}", submitted.len()), kind: step.kind() };
        submitted.push(step);
        tx
    }
}

#[async_trait]
impl SignerProvider for MockSigner {
    async fn selected_account(&self) -> SdkResult<Account> {
        self.account.clone().ok_or(SdkError::NoAccountSelected)
    }

    async fn sign_and_submit_transfer(&self, params: TransferParams) -> SdkResult<SubmittedTx> {
        self.check_rejection()?;
        Ok(self.record(ChainedStep::Transfer(params)))
    }

    async fn sign_and_submit_contract_call(&self, params: ContractCallParams) -> SdkResult<SubmittedTx> {
        self.check_rejection()?;
        Ok(self.record(ChainedStep::ContractCall(params)))
    }

    async fn sign_and_submit_chained(&self, steps: Vec<ChainedStep>) -> SdkResult<Vec<SubmittedTx>> {
        self.check_rejection()?;
        self.chains.lock().unwrap().push(steps.clone());
        let kinds = self.chained_kinds.lock().unwrap().clone();
        Ok(match kinds {
            Some(kinds) => kinds
                .into_iter()
                .enumerate()
                .map(|(i, kind)| SubmittedTx { tx_id: format!("chain-{}", i), kind })
                .collect(),
            None => steps
                .iter()
                .enumerate()
                .map(|(i, step)| SubmittedTx { tx_id: format!("chain-{}", i), kind: step.kind() })
                .collect(),
        })
    }

    async fn sign_raw(&self, _signer_address: &Address, unsigned_tx: &str) -> SdkResult<String> {
        self.check_rejection()?;
        Ok(format!("sig-{}", unsigned_tx))
    }

    async fn submit_signed(&self, unsigned_tx: &str, _signature: &str) -> SdkResult<SubmittedTx> {
        self.check_rejection()?;
        Ok(SubmittedTx { tx_id: unsigned_tx.to_string(), kind: TxKind::ExecuteScript })
    }
}
