//! # Transaction Orchestrator
//!
//! Builds contract calls and transfers with the fixed ALPH attachments each
//! operation needs, hands them to the external signer and classifies what
//! comes back. Three shapes are supported:
//!
//! 1. A single contract call or transfer
//! 2. A chain of steps submitted as one unit (fund-then-unstake,
//!    top-up-then-unstake)
//! 3. A captured call (`BuildResult`) that is only built, then submitted on
//!    its own or used as a chain step

pub mod builders;
pub mod chained;
pub mod lifecycle;
pub mod params;

pub use lifecycle::{PendingTx, TxStage};
pub use params::{
    BuildResult, ChainedStep, ContractCallParams, Destination, MethodRef, Operation, SubmittedTx, TokenTransfer,
    TransferParams, TxKind,
};

use crate::config::SdkConfig;
use crate::error::{classify_rejection, RejectionContext, SdkError, SdkResult};
use crate::pool::PoolReader;
use crate::provider::{NodeProvider, SignerProvider};
use crate::staking::StakingAccountant;
use ayin_core::codec::Address;
use std::sync::Arc;
use tracing::{info, warn};

/// Write-path client
pub struct Orchestrator {
    node: Arc<dyn NodeProvider>,
    signer: Arc<dyn SignerProvider>,
    config: Arc<SdkConfig>,
    accountant: StakingAccountant,
    pools: PoolReader,
}

impl Orchestrator {
    pub fn new(node: Arc<dyn NodeProvider>, signer: Arc<dyn SignerProvider>, config: Arc<SdkConfig>) -> SdkResult<Self> {
        let registry = Arc::new(config.build_registry()?);
        let accountant = StakingAccountant::from_config(node.clone(), &config)?;
        let pools = PoolReader::new(node.clone(), registry);
        Ok(Self { node, signer, config, accountant, pools })
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn node(&self) -> &Arc<dyn NodeProvider> {
        &self.node
    }

    pub fn accountant(&self) -> &StakingAccountant {
        &self.accountant
    }

    pub fn pools(&self) -> &PoolReader {
        &self.pools
    }

    /// Address of the account currently selected in the wallet
    pub async fn signer_address(&self) -> SdkResult<Address> {
        Ok(self.signer.selected_account().await?.address)
    }

    // ========================================================================
    // Submission
    // ========================================================================

    /// Sign and submit one captured call
    pub async fn submit(&self, build: BuildResult) -> SdkResult<PendingTx> {
        let mut pending = PendingTx::new(build.operation);
        self.submit_tracked(&mut pending, &build).await?;
        Ok(pending)
    }

    /// Sign and submit `build`, advancing `pending` along the way. A refused
    /// request leaves `pending` in `Rejected`.
    pub async fn submit_tracked(&self, pending: &mut PendingTx, build: &BuildResult) -> SdkResult<()> {
        let result = self.signer.sign_and_submit_contract_call(build.params.clone()).await;
        let submitted = Self::settle(result, pending, build.rejection_context())?;
        info!(operation = ?pending.operation, tx_id = %submitted.tx_id, "submitted");
        Ok(())
    }

    /// Sign and submit a plain transfer
    pub async fn submit_transfer(&self, params: TransferParams) -> SdkResult<PendingTx> {
        let mut pending = PendingTx::new(Operation::Transfer);
        let result = self.signer.sign_and_submit_transfer(params).await;
        let submitted = Self::settle(result, &mut pending, RejectionContext::default())?;
        info!(tx_id = %submitted.tx_id, "transfer submitted");
        Ok(pending)
    }

    /// Sign and submit steps as one unit; one result per step, in order
    pub async fn submit_chained(
        &self,
        steps: Vec<ChainedStep>,
        ctx: RejectionContext<'_>,
    ) -> SdkResult<Vec<SubmittedTx>> {
        let expected = steps.len();
        let results = match self.signer.sign_and_submit_chained(steps).await {
            Ok(results) => results,
            Err(SdkError::Rejected(message)) => {
                let err = classify_rejection(&message, &ctx);
                warn!(error = %err, "chained submission rejected");
                return Err(err);
            }
            Err(e) => return Err(e),
        };
        if results.len() != expected {
            return Err(SdkError::ChainedResultMissing { expected, got: results.len() });
        }
        info!(steps = expected, "chained submission accepted");
        Ok(results)
    }

    /// Record the signer's answer on `pending`, classifying a refusal
    fn settle(
        result: SdkResult<SubmittedTx>,
        pending: &mut PendingTx,
        ctx: RejectionContext<'_>,
    ) -> SdkResult<SubmittedTx> {
        match result {
            Ok(submitted) => {
                pending.mark_signed()?;
                pending.mark_submitted(submitted.tx_id.clone())?;
                Ok(submitted)
            }
            Err(e) => {
                pending.mark_rejected()?;
                let err = match e {
                    SdkError::Rejected(message) => classify_rejection(&message, &ctx),
                    other => other,
                };
                warn!(operation = ?pending.operation, error = %err, "signer rejected request");
                Err(err)
            }
        }
    }
}
