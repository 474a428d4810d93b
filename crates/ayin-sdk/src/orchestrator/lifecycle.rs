//! Transaction lifecycle tracking
//!
//! `Built -> Signed -> Submitted -> Confirmed | Rejected`. The orchestrator
//! advances a request up to `Submitted`, or to `Rejected` when the signer
//! refuses it; confirmation is observed elsewhere.

use crate::error::{SdkError, SdkResult};
use crate::orchestrator::params::Operation;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStage {
    Built,
    Signed,
    Submitted,
    Confirmed,
    Rejected,
}

impl TxStage {
    pub fn can_advance_to(self, next: TxStage) -> bool {
        use TxStage::*;
        matches!(
            (self, next),
            (Built, Signed)
                | (Signed, Submitted)
                | (Submitted, Confirmed)
                | (Built, Rejected)
                | (Signed, Rejected)
                | (Submitted, Rejected)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TxStage::Confirmed | TxStage::Rejected)
    }
}

impl fmt::Display for TxStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A request moving through its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTx {
    pub operation: Operation,
    stage: TxStage,
    tx_id: Option<String>,
}

impl PendingTx {
    pub fn new(operation: Operation) -> Self {
        Self { operation, stage: TxStage::Built, tx_id: None }
    }

    pub fn stage(&self) -> TxStage {
        self.stage
    }

    pub fn tx_id(&self) -> Option<&str> {
        self.tx_id.as_deref()
    }

    pub fn advance(&mut self, next: TxStage) -> SdkResult<()> {
        if !self.stage.can_advance_to(next) {
            return Err(SdkError::InvalidTransition {
                from: self.stage.to_string(),
                to: next.to_string(),
            });
        }
        self.stage = next;
        Ok(())
    }

    pub fn mark_signed(&mut self) -> SdkResult<()> {
        self.advance(TxStage::Signed)
    }

    pub fn mark_submitted(&mut self, tx_id: impl Into<String>) -> SdkResult<()> {
        self.advance(TxStage::Submitted)?;
        self.tx_id = Some(tx_id.into());
        Ok(())
    }

    pub fn mark_confirmed(&mut self) -> SdkResult<()> {
        self.advance(TxStage::Confirmed)
    }

    pub fn mark_rejected(&mut self) -> SdkResult<()> {
        self.advance(TxStage::Rejected)
    }
}
