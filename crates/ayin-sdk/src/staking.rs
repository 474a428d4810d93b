//! Staking reward accountant
//!
//! Reads a participant's position from the two staking generations:
//!
//! - StakingV4 keeps each participant in a StakingAccount sub-contract and
//!   `getStakingAccount` returns its 32-byte id.
//! - StakingV2 returns the account inline, as a tuple, struct or byte vector.
//!
//! Read methods never fail: any node error or unexpected shape is logged and
//! reported as zero. `lp_token_id` is the exception since a stake built on a
//! wrong token id would lose funds.

use crate::config::SdkConfig;
use crate::error::{SdkError, SdkResult};
use crate::provider::{ContractKind, NodeProvider, ViewCall};
use ayin_core::codec::{Address, ContractId, RawValue, StakedAmountDecoder, Val};
use ayin_core::{CoreError, Protocol, Registry, StakingSnapshot, U256};
use std::sync::Arc;
use tracing::{debug, warn};

/// Where a participant's account data lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountRef {
    /// StakingAccount sub-contract
    SubContract(ContractId),
    /// Account returned inline by the parent
    Inline(RawValue),
    /// Participant never staked
    Missing,
}

impl AccountRef {
    /// Classify a full `getStakingAccount` answer. A reference in first
    /// position wins over anything returned alongside it.
    fn from_raw(raw: RawValue) -> Self {
        match raw.first() {
            RawValue::Null => AccountRef::Missing,
            RawValue::Text(text) => match ContractId::from_hex(text) {
                Ok(id) => AccountRef::SubContract(id),
                Err(_) => AccountRef::Inline(raw),
            },
            _ => AccountRef::Inline(raw),
        }
    }

    /// Arguments identifying this account to the parent's `earned`
    fn as_args(&self) -> Vec<Val> {
        match self {
            AccountRef::SubContract(id) => vec![Val::byte_vec(id.to_hex())],
            AccountRef::Inline(raw) => raw_to_args(raw),
            AccountRef::Missing => Vec::new(),
        }
    }
}

/// Flatten a returned value back into call arguments
fn raw_to_args(raw: &RawValue) -> Vec<Val> {
    match raw {
        RawValue::Null => Vec::new(),
        RawValue::Scalar(v) => vec![Val::u256(*v)],
        RawValue::Text(text) => match Address::parse(text) {
            Ok(address) => vec![Val::address(address.as_str())],
            Err(_) => vec![Val::byte_vec(text.clone())],
        },
        RawValue::Array(items) => items.iter().flat_map(raw_to_args).collect(),
        RawValue::Struct(fields) => fields.values().flat_map(raw_to_args).collect(),
    }
}

/// Zero for a failed read. A missing method index is a setup mistake and is
/// logged as a warning rather than passed off as an empty position.
fn degraded(contract: &Address, what: &str, error: SdkError) -> U256 {
    match error {
        SdkError::UnsupportedMethod { .. } => warn!(contract = %contract, error = %error, "{} unavailable", what),
        _ => debug!(contract = %contract, error = %error, "{} unavailable", what),
    }
    U256::ZERO
}

/// Position reader across staking versions
#[derive(Clone)]
pub struct StakingAccountant {
    node: Arc<dyn NodeProvider>,
    decoder: StakedAmountDecoder,
    registry: Arc<Registry>,
}

impl StakingAccountant {
    pub fn new(node: Arc<dyn NodeProvider>, decoder: StakedAmountDecoder) -> Self {
        Self { node, decoder, registry: Arc::new(Registry::new()) }
    }

    pub fn from_config(node: Arc<dyn NodeProvider>, config: &SdkConfig) -> SdkResult<Self> {
        let decoder = StakedAmountDecoder::new(config.sanity_bound_value()?);
        Ok(Self::new(node, decoder).with_registry(Arc::new(config.build_registry()?)))
    }

    /// Registry consulted for contract state layouts
    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = registry;
        self
    }

    async fn view(&self, call: ViewCall) -> SdkResult<RawValue> {
        Ok(self.node.call_view(call).await?.first().clone())
    }

    async fn view_u256(&self, call: ViewCall) -> SdkResult<U256> {
        Ok(self.view(call).await?.as_u256().unwrap_or(U256::ZERO))
    }

    fn account_call(account: &ContractId, method: &'static str) -> ViewCall {
        ViewCall::new(account.to_address(), ContractKind::StakingAccount, method)
    }

    /// Resolve where `participant`'s account lives
    pub async fn account_ref(
        &self,
        contract: &Address,
        protocol: Protocol,
        participant: &Address,
    ) -> SdkResult<AccountRef> {
        let call = ViewCall::new(contract.clone(), ContractKind::from_protocol(protocol), "getStakingAccount")
            .with_args(vec![Val::address(participant.as_str())]);
        let raw = self.node.call_view(call).await?;
        Ok(AccountRef::from_raw(raw))
    }

    // ========================================================================
    // Read Paths
    // ========================================================================

    /// Staked LP amount; zero when unknown
    pub async fn staked_balance(&self, contract: &Address, protocol: Protocol, participant: &Address) -> U256 {
        self.try_staked_balance(contract, protocol, participant)
            .await
            .unwrap_or_else(|e| degraded(contract, "staked balance", e))
    }

    async fn try_staked_balance(&self, contract: &Address, protocol: Protocol, participant: &Address) -> SdkResult<U256> {
        match self.account_ref(contract, protocol, participant).await? {
            AccountRef::SubContract(id) => self.view_u256(Self::account_call(&id, "getAmountStaked")).await,
            AccountRef::Inline(raw) => {
                debug!(
                    contract = %contract,
                    strategy = ?self.decoder.matching_strategy(&raw),
                    "decoding inline staking account"
                );
                Ok(self.decoder.decode(&raw))
            }
            AccountRef::Missing => Ok(U256::ZERO),
        }
    }

    /// Claimable reward; zero when unknown
    pub async fn earned_reward(&self, contract: &Address, protocol: Protocol, participant: &Address) -> U256 {
        self.try_earned_reward(contract, protocol, participant)
            .await
            .unwrap_or_else(|e| degraded(contract, "earned reward", e))
    }

    async fn try_earned_reward(&self, contract: &Address, protocol: Protocol, participant: &Address) -> SdkResult<U256> {
        let account = self.account_ref(contract, protocol, participant).await?;
        if account == AccountRef::Missing {
            return Ok(U256::ZERO);
        }

        let from_parent = self.parent_earned(contract, protocol, &account).await?;
        match (&account, protocol) {
            (AccountRef::SubContract(id), Protocol::StakingV4) if from_parent == U256::ZERO => {
                // Parent reports zero until the account is settled; recompute
                let snapshot = self.snapshot(contract, protocol, id).await?;
                Ok(snapshot.earned()?)
            }
            _ => Ok(from_parent),
        }
    }

    async fn parent_earned(&self, contract: &Address, protocol: Protocol, account: &AccountRef) -> SdkResult<U256> {
        let call = ViewCall::new(contract.clone(), ContractKind::from_protocol(protocol), "earned")
            .with_args(account.as_args());
        self.view_u256(call).await
    }

    /// Sub-contract checkpoint plus the parent's current reward index
    pub async fn snapshot(&self, contract: &Address, protocol: Protocol, account: &ContractId) -> SdkResult<StakingSnapshot> {
        let (rewards, amount_staked, reward_per_token_paid, reward_per_token) = futures::try_join!(
            self.view_u256(Self::account_call(account, "getRewards")),
            self.view_u256(Self::account_call(account, "getAmountStaked")),
            self.view_u256(Self::account_call(account, "getRewardPerTokenPaid")),
            self.view_u256(ViewCall::new(
                contract.clone(),
                ContractKind::from_protocol(protocol),
                "calculateRewardPerToken"
            )),
        )?;
        Ok(StakingSnapshot { amount_staked, reward_per_token_paid, rewards, reward_per_token })
    }

    /// Rewards stored on the account, or the parent's `earned` without a sub-contract
    pub async fn stored_rewards(&self, contract: &Address, protocol: Protocol, participant: &Address) -> U256 {
        let result: SdkResult<U256> = async {
            match self.account_ref(contract, protocol, participant).await? {
                AccountRef::SubContract(id) => self.view_u256(Self::account_call(&id, "getRewards")).await,
                AccountRef::Missing => Ok(U256::ZERO),
                inline => self.parent_earned(contract, protocol, &inline).await,
            }
        }
        .await;
        result.unwrap_or_else(|e| degraded(contract, "stored rewards", e))
    }

    /// Paid reward index of a sub-contract account; zero otherwise
    pub async fn reward_per_token_paid(&self, contract: &Address, protocol: Protocol, participant: &Address) -> U256 {
        let result: SdkResult<U256> = async {
            match self.account_ref(contract, protocol, participant).await? {
                AccountRef::SubContract(id) => {
                    self.view_u256(Self::account_call(&id, "getRewardPerTokenPaid")).await
                }
                _ => Ok(U256::ZERO),
            }
        }
        .await;
        result.unwrap_or_else(|e| degraded(contract, "reward per token paid", e))
    }

    /// `amountStaked * rewardPerTokenPaid` of a sub-contract account; zero otherwise
    pub async fn reward_to_paid(&self, contract: &Address, protocol: Protocol, participant: &Address) -> U256 {
        let result: SdkResult<U256> = async {
            match self.account_ref(contract, protocol, participant).await? {
                AccountRef::SubContract(id) => {
                    let (amount, paid) = futures::try_join!(
                        self.view_u256(Self::account_call(&id, "getAmountStaked")),
                        self.view_u256(Self::account_call(&id, "getRewardPerTokenPaid")),
                    )?;
                    Ok(ayin_core::math::reward_to_paid(amount, paid)?)
                }
                _ => Ok(U256::ZERO),
            }
        }
        .await;
        result.unwrap_or_else(|e| degraded(contract, "reward to paid", e))
    }

    /// Owner recorded in contract state, read from the field position the
    /// registry holds for the contract's code hash. `None` when the state
    /// cannot be read or its layout is not registered.
    pub async fn staking_contract_owner(&self, contract: &Address) -> Option<Address> {
        let state = match self.node.contract_state(contract).await {
            Ok(state) => state,
            Err(e) => {
                debug!(contract = %contract, error = %e, "staking contract state unavailable");
                return None;
            }
        };
        let Some(position) = self.registry.owner_field(&state.code_hash) else {
            warn!(contract = %contract, code_hash = %state.code_hash, "no owner field registered for code hash");
            return None;
        };
        state.address_at(position).and_then(|a| Address::parse(a).ok())
    }

    // ========================================================================
    // Write-Path Reads
    // ========================================================================

    /// LP token the staking contract accepts
    pub async fn lp_token_id(&self, contract: &Address, protocol: Protocol) -> SdkResult<ContractId> {
        let raw = self
            .view(ViewCall::new(contract.clone(), ContractKind::from_protocol(protocol), "getTokenId"))
            .await?;
        match raw.as_text() {
            Some(text) => Ok(ContractId::from_hex(text.trim())?),
            None => Err(CoreError::malformed_reference(format!("{:?}", raw)).into()),
        }
    }

    /// Sub-contract id of `participant`'s account, if any
    pub async fn staking_account_id(
        &self,
        contract: &Address,
        protocol: Protocol,
        participant: &Address,
    ) -> SdkResult<Option<ContractId>> {
        match self.account_ref(contract, protocol, participant).await? {
            AccountRef::SubContract(id) => Ok(Some(id)),
            _ => Ok(None),
        }
    }
}
