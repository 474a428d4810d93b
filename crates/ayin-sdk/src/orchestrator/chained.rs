//! Chained submissions
//!
//! Sequences the signer must accept or reject as one unit. Nothing is rolled
//! back if a later step fails on chain.

use super::params::{BuildResult, ChainedStep, Destination, Operation, SubmittedTx, TransferParams, TxKind};
use super::{Orchestrator, PendingTx};
use crate::error::{SdkError, SdkResult};
use ayin_core::codec::Address;
use ayin_core::math::safe_add;
use ayin_core::{CoreError, Protocol, MIN_ALPH_FOR_CLAIM_UNSTAKE, PRECISION, U256};
use tracing::info;

/// Mark a pending request as submitted under the given transaction
fn submitted(operation: Operation, tx: &SubmittedTx) -> SdkResult<PendingTx> {
    let mut pending = PendingTx::new(operation);
    pending.mark_signed()?;
    pending.mark_submitted(tx.tx_id.clone())?;
    Ok(pending)
}

impl Orchestrator {
    /// Fund the caller's StakingAccount with the unstake fee, then unstake.
    ///
    /// The unstake itself attaches no ALPH; the sub-contract pays from the
    /// transfer that precedes it.
    pub async fn unstake_chained(&self, contract: &Address, protocol: Protocol, amount: U256) -> SdkResult<PendingTx> {
        let unstake = self.build_unstake(contract, protocol, amount).await?.with_atto_alph(U256::ZERO);
        let signer = unstake.params.signer_address.clone();

        let account = self
            .accountant()
            .staking_account_id(contract, protocol, &signer)
            .await?
            .ok_or_else(|| SdkError::NoStakingAccount(signer.to_string()))?;

        let fund = TransferParams {
            signer_address: signer,
            destinations: vec![Destination {
                address: account.to_address(),
                atto_alph_amount: MIN_ALPH_FOR_CLAIM_UNSTAKE,
                tokens: Vec::new(),
            }],
        };

        let steps = vec![ChainedStep::Transfer(fund), unstake.clone().into_step()];
        let results = self.submit_chained(steps, unstake.rejection_context()).await?;
        let unstake_tx = &results[1];
        if unstake_tx.kind != TxKind::ExecuteScript {
            return Err(SdkError::Rejected(format!(
                "second chained result is a {:?}, expected a script execution",
                unstake_tx.kind
            )));
        }

        info!(account = %account, tx_id = %unstake_tx.tx_id, "funded account and unstaked");
        submitted(Operation::Unstake, unstake_tx)
    }

    /// Top up the reward pool with `top_up_whole_ayin` AYIN, then unstake
    /// `amount`, so the unstake can pay out rewards the pool was short of.
    pub async fn top_up_then_unstake(
        &self,
        contract: &Address,
        protocol: Protocol,
        top_up_whole_ayin: U256,
        amount: U256,
    ) -> SdkResult<PendingTx> {
        if amount == U256::ZERO {
            return Err(CoreError::InvalidInput("unstake amount must be positive").into());
        }
        let top_up = self.build_top_up_rewards(top_up_whole_ayin).await?;
        let unstake = self.build_unstake(contract, protocol, amount).await?;

        let steps = vec![top_up.into_step(), unstake.clone().into_step()];
        let results = self.submit_chained(steps, unstake.rejection_context()).await?;
        let last = results
            .last()
            .ok_or(SdkError::ChainedResultMissing { expected: 2, got: 0 })?;

        info!(tx_id = %last.tx_id, "topped up rewards and unstaked");
        submitted(Operation::Unstake, last)
    }

    /// Top-up covering a reward shortfall reported by a rejected call: the
    /// missing amount plus one. Without a shortfall, one whole AYIN.
    pub async fn build_top_up_for_shortfall(&self, rejection: Option<&SdkError>) -> SdkResult<BuildResult> {
        match rejection {
            Some(SdkError::InsufficientApprovedBalance { missing, .. }) => {
                self.build_top_up_rewards_raw(safe_add(*missing, U256::ONE)?).await
            }
            _ => self.build_top_up_rewards_raw(PRECISION).await,
        }
    }
}
