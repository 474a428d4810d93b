//! # Constant-Product Pricing
//!
//! Swap quotes and liquidity previews for Ayin TokenPair pools.
//!
//! Exact-input quotes use a 990/1000 fee factor while exact-output quotes use
//! 997/1000. The two conventions come from the deployed router and are kept
//! as-is, so `amount_out(amount_in(y))` can land slightly below `y` when the
//! deployed factors are mixed.

use crate::constants::{
    BPS_DENOMINATOR, EXACT_IN_FEE_NUMERATOR, EXACT_OUT_FEE_NUMERATOR, FEE_DENOMINATOR,
};
use crate::errors::{CoreError, CoreResult};
use crate::math::safe_math::{safe_add, safe_calculate_bps, safe_div, safe_mul, safe_mul_div, safe_sub};
use ethnum::U256;

/// Fee factor applied to the input side: `numerator / denominator` of the
/// input counts toward the swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeRate {
    pub numerator: u32,
    pub denominator: u32,
}

impl FeeRate {
    /// Deployed factor for exact-input quotes (1% fee)
    pub const EXACT_IN: FeeRate = FeeRate::new(EXACT_IN_FEE_NUMERATOR, FEE_DENOMINATOR);

    /// Deployed factor for exact-output quotes (0.3% fee)
    pub const EXACT_OUT: FeeRate = FeeRate::new(EXACT_OUT_FEE_NUMERATOR, FEE_DENOMINATOR);

    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self { numerator, denominator }
    }

    fn validate(&self) -> CoreResult<()> {
        if self.denominator == 0 || self.numerator == 0 || self.numerator > self.denominator {
            return Err(CoreError::InvalidInput("fee factor must be in (0, 1]"));
        }
        Ok(())
    }

    fn num(&self) -> U256 {
        U256::from(self.numerator)
    }

    fn den(&self) -> U256 {
        U256::from(self.denominator)
    }
}

/// Output received for an exact `amount_in`.
///
/// `out = amount_in·num·reserve_out / (amount_in·num + reserve_in·den)`
pub fn amount_out(
    reserve_in: U256,
    reserve_out: U256,
    amount_in: U256,
    fee: FeeRate,
) -> CoreResult<U256> {
    if amount_in == U256::ZERO {
        return Err(CoreError::InvalidInput("amount in must be positive"));
    }
    if reserve_in == U256::ZERO || reserve_out == U256::ZERO {
        return Err(CoreError::InvalidInput("pool has no liquidity"));
    }
    fee.validate()?;

    let in_with_fee = safe_mul(amount_in, fee.num())?;
    let numerator = safe_mul(in_with_fee, reserve_out)?;
    let denominator = safe_add(in_with_fee, safe_mul(reserve_in, fee.den())?)?;
    safe_div(numerator, denominator)
}

/// Input required to receive an exact `amount_out`.
///
/// `in = reserve_in·amount_out·den / ((reserve_out − amount_out)·num) + 1`
pub fn amount_in(
    reserve_in: U256,
    reserve_out: U256,
    amount_out: U256,
    fee: FeeRate,
) -> CoreResult<U256> {
    if amount_out == U256::ZERO {
        return Err(CoreError::InvalidInput("amount out must be positive"));
    }
    if amount_out >= reserve_out {
        return Err(CoreError::output_exceeds_reserve(amount_out, reserve_out));
    }
    if reserve_in == U256::ZERO {
        return Err(CoreError::InvalidInput("pool has no liquidity"));
    }
    fee.validate()?;

    let numerator = safe_mul(safe_mul(reserve_in, amount_out)?, fee.den())?;
    let denominator = safe_mul(safe_sub(reserve_out, amount_out)?, fee.num())?;
    safe_add(safe_div(numerator, denominator)?, U256::ONE)
}

/// LP tokens a deposit would mint against the current reserves. Preview only;
/// the pair contract decides the actual amount.
pub fn liquidity_minted(
    amount0: U256,
    amount1: U256,
    reserve0: U256,
    reserve1: U256,
    total_supply: U256,
) -> CoreResult<U256> {
    if reserve0 == U256::ZERO || reserve1 == U256::ZERO {
        return Ok(U256::ZERO);
    }
    let from0 = safe_mul_div(amount0, total_supply, reserve0)?;
    let from1 = safe_mul_div(amount1, total_supply, reserve1)?;
    Ok(from0.min(from1))
}

/// Token amounts returned for burning `liquidity` LP tokens
pub fn amounts_for_burn(
    liquidity: U256,
    reserve0: U256,
    reserve1: U256,
    total_supply: U256,
) -> CoreResult<(U256, U256)> {
    if total_supply == U256::ZERO {
        return Ok((U256::ZERO, U256::ZERO));
    }
    Ok((
        safe_mul_div(liquidity, reserve0, total_supply)?,
        safe_mul_div(liquidity, reserve1, total_supply)?,
    ))
}

/// Minimum acceptable output after `slippage_bps` of tolerance
pub fn min_amount_out(amount: U256, slippage_bps: u32) -> CoreResult<U256> {
    if slippage_bps > BPS_DENOMINATOR {
        return Err(CoreError::InvalidInput("slippage above 100%"));
    }
    safe_calculate_bps(amount, BPS_DENOMINATOR - slippage_bps)
}

/// Maximum acceptable input after `slippage_bps` of tolerance
pub fn max_amount_in(amount: U256, slippage_bps: u32) -> CoreResult<U256> {
    if slippage_bps > BPS_DENOMINATOR {
        return Err(CoreError::InvalidInput("slippage above 100%"));
    }
    safe_calculate_bps(amount, BPS_DENOMINATOR + slippage_bps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e18(v: u128) -> U256 {
        U256::new(v) * U256::new(1_000_000_000_000_000_000)
    }

    #[test]
    fn test_amount_out_reference_pool() {
        let out = amount_out(e18(1_000_000), e18(500_000), e18(1_000), FeeRate::EXACT_IN).unwrap();
        assert_eq!(out, U256::new(494_510_434_669_677_019_750));
    }

    #[test]
    fn test_amount_out_rejects_zero_inputs() {
        assert!(matches!(
            amount_out(e18(1), e18(1), U256::ZERO, FeeRate::EXACT_IN),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            amount_out(U256::ZERO, e18(1), U256::ONE, FeeRate::EXACT_IN),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            amount_out(e18(1), U256::ZERO, U256::ONE, FeeRate::EXACT_IN),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_amount_out_overflow_is_reported() {
        let res = amount_out(U256::ONE, U256::MAX, U256::MAX / U256::new(2), FeeRate::EXACT_IN);
        assert_eq!(res, Err(CoreError::MathOverflow));
    }

    #[test]
    fn test_amount_in_reference_pool() {
        let needed = amount_in(e18(1_000_000), e18(500_000), e18(1_000), FeeRate::EXACT_OUT).unwrap();
        assert_eq!(needed, U256::new(2_010_038_130_423_334_130_649));
    }

    #[test]
    fn test_amount_in_output_at_reserve() {
        let res = amount_in(e18(10), e18(10), e18(10), FeeRate::EXACT_OUT);
        assert!(matches!(res, Err(CoreError::OutputExceedsReserve { .. })));
        let res = amount_in(e18(10), e18(10), e18(11), FeeRate::EXACT_OUT);
        assert!(matches!(res, Err(CoreError::OutputExceedsReserve { .. })));
    }

    #[test]
    fn test_amount_in_reserve_bound_before_empty_input_side() {
        let res = amount_in(U256::ZERO, e18(10), e18(10), FeeRate::EXACT_OUT);
        assert!(matches!(res, Err(CoreError::OutputExceedsReserve { .. })));
        let res = amount_in(U256::ZERO, U256::ZERO, U256::ONE, FeeRate::EXACT_OUT);
        assert!(matches!(res, Err(CoreError::OutputExceedsReserve { .. })));
        let res = amount_in(U256::ZERO, e18(10), e18(1), FeeRate::EXACT_OUT);
        assert_eq!(res, Err(CoreError::InvalidInput("pool has no liquidity")));
    }

    #[test]
    fn test_deployed_fee_mix_under_delivers() {
        let (r_in, r_out) = (U256::new(1_000_000), U256::new(1_000_000));
        let target = U256::new(10_000);
        let needed = amount_in(r_in, r_out, target, FeeRate::EXACT_OUT).unwrap();
        assert_eq!(needed, U256::new(10_132));
        let received = amount_out(r_in, r_out, needed, FeeRate::EXACT_IN).unwrap();
        assert_eq!(received, U256::new(9_931));
        assert!(received < target);
    }

    #[test]
    fn test_invalid_fee_factor() {
        let res = amount_out(e18(1), e18(1), U256::ONE, FeeRate::new(1_001, 1_000));
        assert!(matches!(res, Err(CoreError::InvalidInput(_))));
        let res = amount_out(e18(1), e18(1), U256::ONE, FeeRate::new(1, 0));
        assert!(matches!(res, Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn test_liquidity_minted_takes_minimum() {
        let minted = liquidity_minted(
            U256::new(100),
            U256::new(300),
            U256::new(1_000),
            U256::new(2_000),
            U256::new(500),
        )
        .unwrap();
        // 100*500/1000 = 50, 300*500/2000 = 75
        assert_eq!(minted, U256::new(50));
    }

    #[test]
    fn test_liquidity_minted_empty_pool() {
        let minted = liquidity_minted(U256::new(1), U256::new(1), U256::ZERO, U256::new(5), U256::new(5)).unwrap();
        assert_eq!(minted, U256::ZERO);
    }

    #[test]
    fn test_amounts_for_burn() {
        let (a, b) = amounts_for_burn(U256::new(50), U256::new(1_000), U256::new(2_000), U256::new(500)).unwrap();
        assert_eq!((a, b), (U256::new(100), U256::new(200)));
        let empty = amounts_for_burn(U256::new(50), U256::new(1), U256::new(1), U256::ZERO).unwrap();
        assert_eq!(empty, (U256::ZERO, U256::ZERO));
    }

    #[test]
    fn test_slippage_bounds() {
        assert_eq!(min_amount_out(U256::new(10_000), 50).unwrap(), U256::new(9_950));
        assert_eq!(max_amount_in(U256::new(10_000), 50).unwrap(), U256::new(10_050));
        assert!(min_amount_out(U256::new(1), 10_001).is_err());
    }
}
