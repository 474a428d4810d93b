//! # Reward Accrual
//!
//! Reward-per-token accounting used by every staking version:
//!
//! `earned = rewards + amount_staked * (reward_per_token - reward_per_token_paid) / PRECISION`

use crate::constants::PRECISION;
use crate::errors::CoreResult;
use crate::math::safe_math::{safe_add, safe_mul, safe_mul_div, saturating_delta};
use ethnum::U256;

/// Reward accrued since the participant's last checkpoint.
///
/// A `reward_per_token` below the participant's paid index yields zero
/// accrual rather than an underflow.
pub fn pending_reward(
    amount_staked: U256,
    reward_per_token: U256,
    reward_per_token_paid: U256,
) -> CoreResult<U256> {
    let delta = saturating_delta(reward_per_token, reward_per_token_paid);
    safe_mul_div(amount_staked, delta, PRECISION)
}

/// Stored rewards plus pending accrual
pub fn earned(
    rewards: U256,
    amount_staked: U256,
    reward_per_token: U256,
    reward_per_token_paid: U256,
) -> CoreResult<U256> {
    safe_add(rewards, pending_reward(amount_staked, reward_per_token, reward_per_token_paid)?)
}

/// `amount_staked * reward_per_token_paid`, unscaled; the checkpoint the
/// contract subtracts when it next settles the account
pub fn reward_to_paid(amount_staked: U256, reward_per_token_paid: U256) -> CoreResult<U256> {
    safe_mul(amount_staked, reward_per_token_paid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e18(v: u128) -> U256 {
        U256::new(v) * PRECISION
    }

    #[test]
    fn test_earned_accrual() {
        // 100 + 50 * (4e18 - 2e18) / 1e18
        let value = earned(U256::new(100), U256::new(50), e18(4), e18(2)).unwrap();
        assert_eq!(value, U256::new(200));
    }

    #[test]
    fn test_earned_floors() {
        let value = earned(U256::ZERO, U256::new(3), U256::new(500_000_000_000_000_000), U256::ZERO).unwrap();
        // 3 * 0.5 = 1.5 -> 1
        assert_eq!(value, U256::ONE);
    }

    #[test]
    fn test_paid_index_ahead_yields_stored_rewards() {
        let value = earned(U256::new(7), e18(10), e18(1), e18(2)).unwrap();
        assert_eq!(value, U256::new(7));
    }

    #[test]
    fn test_reward_to_paid() {
        assert_eq!(reward_to_paid(U256::new(3), U256::new(4)).unwrap(), U256::new(12));
    }
}
