//! Pool state reader
//!
//! Reserves are read straight from pair contract state. The code hash picks
//! the field layout; only the V1 pair layout is known, and unknown hashes are
//! read with it too.

use crate::error::{SdkError, SdkResult};
use crate::provider::NodeProvider;
use ayin_core::codec::{Address, ContractId};
use ayin_core::{
    CoreError, PairState, PoolReserves, Protocol, Registry, TokenId, PAIR_RESERVE0_FIELD, PAIR_RESERVE1_FIELD,
    PAIR_TOTAL_SUPPLY_FIELD, U256,
};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct PoolReader {
    node: Arc<dyn NodeProvider>,
    registry: Arc<Registry>,
}

impl PoolReader {
    pub fn new(node: Arc<dyn NodeProvider>, registry: Arc<Registry>) -> Self {
        Self { node, registry }
    }

    /// Current reserves of `pair`; `None` when state is unavailable or not a pool
    pub async fn fetch_reserves(&self, pair: &Address) -> Option<PoolReserves> {
        let state = match self.node.contract_state(pair).await {
            Ok(state) => state,
            Err(e) => {
                debug!(pair = %pair, error = %e, "pair state unavailable");
                return None;
            }
        };

        match self.registry.resolve(&state.code_hash) {
            Ok(Protocol::PoolV1) => {}
            Err(CoreError::UnknownContract(hash)) => {
                debug!(pair = %pair, code_hash = %hash, "unknown code hash, reading as V1 pair");
            }
            Ok(protocol) => {
                debug!(pair = %pair, protocol = %protocol, "contract is not a pool");
                return None;
            }
            Err(e) => {
                debug!(pair = %pair, error = %e, "code hash lookup failed");
                return None;
            }
        }

        let reserves = PoolReserves {
            reserve0: state.mut_u256(PAIR_RESERVE0_FIELD)?,
            reserve1: state.mut_u256(PAIR_RESERVE1_FIELD)?,
            // Quote-only reads work without it
            total_supply: state.mut_u256(PAIR_TOTAL_SUPPLY_FIELD).unwrap_or(U256::ZERO),
        };
        debug!(
            pair = %pair,
            reserve0 = %reserves.reserve0,
            reserve1 = %reserves.reserve1,
            total_supply = %reserves.total_supply,
            "pair reserves"
        );
        Some(reserves)
    }

    /// Pair tokens plus fresh reserves, ready for quoting
    pub async fn fetch_pair_state(&self, pair: &Address, token0: TokenId, token1: TokenId) -> SdkResult<PairState> {
        let pair_id = ContractId::from_address(pair)?;
        let reserves = self
            .fetch_reserves(pair)
            .await
            .ok_or_else(|| SdkError::NodeResponse(format!("reserves of {} unavailable", pair)))?;
        Ok(PairState { pair_id, token0, token1, reserves })
    }
}
