//! # Core Types
//!
//! Pool and staking state as read from chain, with the pricing and accrual
//! operations that apply to them.

use crate::codec::address::ContractId;
use crate::errors::{CoreError, CoreResult};
use crate::math::amm::{amount_in, amount_out, amounts_for_burn, liquidity_minted, FeeRate};
use crate::math::reward;
use ethnum::U256;

/// Token ids share the contract id space; ALPH is the all-zero id
pub type TokenId = ContractId;

/// All-zero id of the native ALPH token
pub const ALPH_TOKEN: TokenId = ContractId::new([0u8; 32]);

// ============================================================================
// Pool State
// ============================================================================

/// Reserves and LP supply of one pair, read fresh before every quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolReserves {
    pub reserve0: U256,
    pub reserve1: U256,
    pub total_supply: U256,
}

/// A pair's tokens together with its current reserves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairState {
    pub pair_id: ContractId,
    pub token0: TokenId,
    pub token1: TokenId,
    pub reserves: PoolReserves,
}

/// Direction of a swap through a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapSide {
    ZeroForOne,
    OneForZero,
}

impl PairState {
    /// LP token id; a pair issues its own LP token
    pub fn lp_token_id(&self) -> TokenId {
        self.pair_id
    }

    pub fn side_for_input(&self, token_in: &TokenId) -> CoreResult<SwapSide> {
        if *token_in == self.token0 {
            Ok(SwapSide::ZeroForOne)
        } else if *token_in == self.token1 {
            Ok(SwapSide::OneForZero)
        } else {
            Err(CoreError::TokenNotInPair(token_in.to_hex()))
        }
    }

    fn oriented(&self, side: SwapSide) -> (U256, U256) {
        match side {
            SwapSide::ZeroForOne => (self.reserves.reserve0, self.reserves.reserve1),
            SwapSide::OneForZero => (self.reserves.reserve1, self.reserves.reserve0),
        }
    }

    /// Output for selling exactly `amount` of `token_in`
    pub fn quote_exact_in(&self, token_in: &TokenId, amount: U256) -> CoreResult<U256> {
        let (reserve_in, reserve_out) = self.oriented(self.side_for_input(token_in)?);
        amount_out(reserve_in, reserve_out, amount, FeeRate::EXACT_IN)
    }

    /// Input required to buy exactly `amount` of `token_out`
    pub fn quote_exact_out(&self, token_out: &TokenId, amount: U256) -> CoreResult<U256> {
        // Buying token1 means selling token0
        let side = match self.side_for_input(token_out)? {
            SwapSide::ZeroForOne => SwapSide::OneForZero,
            SwapSide::OneForZero => SwapSide::ZeroForOne,
        };
        let (reserve_in, reserve_out) = self.oriented(side);
        amount_in(reserve_in, reserve_out, amount, FeeRate::EXACT_OUT)
    }

    pub fn preview_mint(&self, amount0: U256, amount1: U256) -> CoreResult<U256> {
        liquidity_minted(
            amount0,
            amount1,
            self.reserves.reserve0,
            self.reserves.reserve1,
            self.reserves.total_supply,
        )
    }

    pub fn preview_burn(&self, liquidity: U256) -> CoreResult<(U256, U256)> {
        amounts_for_burn(
            liquidity,
            self.reserves.reserve0,
            self.reserves.reserve1,
            self.reserves.total_supply,
        )
    }
}

// ============================================================================
// Staking State
// ============================================================================

/// Per-participant staking checkpoint plus the parent's current index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StakingSnapshot {
    pub amount_staked: U256,
    pub reward_per_token_paid: U256,
    pub rewards: U256,
    pub reward_per_token: U256,
}

impl StakingSnapshot {
    pub fn earned(&self) -> CoreResult<U256> {
        reward::earned(
            self.rewards,
            self.amount_staked,
            self.reward_per_token,
            self.reward_per_token_paid,
        )
    }

    pub fn reward_to_paid(&self) -> CoreResult<U256> {
        reward::reward_to_paid(self.amount_staked, self.reward_per_token_paid)
    }
}
