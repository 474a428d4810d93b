//! # Protocol Constants
//!
//! Fixed values baked into the deployed Ayin contracts:
//! - Fixed-point scales used by staking contracts
//! - Swap fee conventions
//! - Operational ALPH amounts attached to calls
//! - Known contract layouts and code hashes

use ethnum::U256;

// ============================================================================
// Mathematical Constants
// ============================================================================

/// Fixed-point scale used by `rewardPerToken` accounting (10^18)
pub const PRECISION: U256 = U256::new(1_000_000_000_000_000_000);

/// Decimals of ALPH and of every LP / AYIN token
pub const DEFAULT_DECIMALS: u8 = 18;

/// Basis points denominator (10,000 = 100%)
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Default slippage tolerance for swaps (0.5%)
pub const DEFAULT_SLIPPAGE_BPS: u32 = 50;

/// Largest plausible staked amount; raw words above this are treated as
/// something other than an amount (10^24 smallest units)
pub const DEFAULT_SANITY_BOUND: U256 = U256::new(1_000_000_000_000_000_000_000_000);

// ============================================================================
// Fee Constants
// ============================================================================

/// Fee denominator of the per-mille fee convention
pub const FEE_DENOMINATOR: u32 = 1_000;

/// Fee numerator used for exact-input quotes (1% fee)
pub const EXACT_IN_FEE_NUMERATOR: u32 = 990;

/// Fee numerator used for exact-output quotes (0.3% fee)
pub const EXACT_OUT_FEE_NUMERATOR: u32 = 997;

// ============================================================================
// Operational Amounts
// ============================================================================

/// One ALPH in atto units
pub const ONE_ALPH: U256 = U256::new(1_000_000_000_000_000_000);

/// Dust amount the VM requires for new outputs (0.001 ALPH)
pub const DUST_AMOUNT: U256 = U256::new(1_000_000_000_000_000);

/// ALPH attached to claim and unstake calls (0.002 ALPH)
pub const MIN_ALPH_FOR_CLAIM_UNSTAKE: U256 = U256::new(2_000_000_000_000_000);

/// ALPH attached to stake calls; funds the StakingAccount sub-contract
pub const STAKE_ALPH_AMOUNT: U256 = ONE_ALPH;

/// Token id representing native ALPH
pub const ALPH_TOKEN_ID: &str = "0000000000000000000000000000000000000000000000000000000000000000";

// ============================================================================
// Contract Layouts
// ============================================================================

/// Mutable field index of `reserve0` in TokenPair V1
pub const PAIR_RESERVE0_FIELD: usize = 0;

/// Mutable field index of `reserve1` in TokenPair V1
pub const PAIR_RESERVE1_FIELD: usize = 1;

/// Mutable field index of `totalSupply` in TokenPair V1
pub const PAIR_TOTAL_SUPPLY_FIELD: usize = 5;

/// Method index of the reward top-up entry point on single-asset staking
pub const TOP_UP_REWARDS_METHOD_INDEX: u32 = 20;

/// Length of a hex-encoded contract id
pub const CONTRACT_ID_HEX_LEN: usize = 64;

/// Number of address groups on mainnet
pub const TOTAL_GROUPS: u8 = 4;

// ============================================================================
// Known Code Hashes
// ============================================================================

/// StakingV4 variant deployed for the single ALPH/AYIN stake
pub const STAKING_V4_ALIAS_A: &str = "ac23901b2567dbd26ff1b19681d54b8310d1cb9622a24bf94482c7ac66940a20";

/// StakingV4 variant deployed for the newer LP farms
pub const STAKING_V4_ALIAS_B: &str = "cb665a9ca0fff0b0e237b0b21c15b5890bb8366a814ad9d2afd64c1b73fc83f3";

/// Staking V2 deployment
pub const STAKING_V2_HASH: &str = "8674144cd2f1351516913e68b9e3014d6340d5c572dcde909615d61b4fda587c";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_matches_alph_scale() {
        assert_eq!(PRECISION, U256::new(10).pow(DEFAULT_DECIMALS as u32));
        assert_eq!(ONE_ALPH, PRECISION);
    }

    #[test]
    fn test_operational_amounts() {
        assert_eq!(MIN_ALPH_FOR_CLAIM_UNSTAKE, DUST_AMOUNT * U256::new(2));
        assert!(STAKE_ALPH_AMOUNT > MIN_ALPH_FOR_CLAIM_UNSTAKE);
    }

    #[test]
    fn test_fee_convention() {
        assert!(EXACT_IN_FEE_NUMERATOR < EXACT_OUT_FEE_NUMERATOR);
        assert!(EXACT_OUT_FEE_NUMERATOR < FEE_DENOMINATOR);
    }

    #[test]
    fn test_known_hashes_are_normalized() {
        for hash in [STAKING_V4_ALIAS_A, STAKING_V4_ALIAS_B, STAKING_V2_HASH] {
            assert_eq!(hash.len(), CONTRACT_ID_HEX_LEN);
            assert_eq!(hash, hash.to_lowercase());
        }
    }
}
