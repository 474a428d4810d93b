//! # Ayin SDK
//!
//! Async client for the Ayin DEX on Alephium. Provides:
//! - Node and explorer access behind the `NodeProvider` trait
//! - Pool reserve reads and quoting
//! - Staking position reads across staking contract versions
//! - Public key and staker resolution
//! - Transaction building and submission through an external signer
//!
//! Pure math and encoding live in `ayin-core` and are re-exported here.

pub mod config;
pub mod error;
pub mod keys;
pub mod orchestrator;
pub mod pool;
pub mod provider;
pub mod staking;

pub use config::SdkConfig;
pub use error::{classify_rejection, RejectionContext, SdkError, SdkResult};
pub use keys::KeyResolver;
pub use orchestrator::{BuildResult, Orchestrator, PendingTx, TxStage};
pub use pool::PoolReader;
pub use provider::{ContractKind, HttpNodeProvider, NodeProvider, SignerProvider, ViewCall};
pub use staking::{AccountRef, StakingAccountant};

// Re-export the core crate
pub use ayin_core;
