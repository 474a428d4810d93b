//! # Safe Math Operations
//!
//! Overflow-checked arithmetic over `U256`. Every intermediate product in the
//! pricing and accrual formulas goes through these helpers so that an
//! overflow surfaces as `MathOverflow` instead of wrapping.

use crate::constants::BPS_DENOMINATOR;
use crate::errors::{CoreError, CoreResult};
use ethnum::U256;

/// Macro to generate safe arithmetic functions
macro_rules! safe_arith {
    // Binary operations with checked methods
    ($fn_name:ident, $checked_method:ident, $error:expr) => {
        /// Checked `U256` operation mapping `None` to a core error
        pub fn $fn_name(a: U256, b: U256) -> CoreResult<U256> {
            a.$checked_method(b).ok_or($error)
        }
    };

    // Division operations with zero check
    (div, $fn_name:ident) => {
        /// Safe floor division with zero check
        pub fn $fn_name(a: U256, b: U256) -> CoreResult<U256> {
            if b == U256::ZERO {
                return Err(CoreError::DivisionByZero);
            }
            Ok(a / b)
        }
    };
}

safe_arith!(safe_add, checked_add, CoreError::MathOverflow);
safe_arith!(safe_sub, checked_sub, CoreError::MathUnderflow);
safe_arith!(safe_mul, checked_mul, CoreError::MathOverflow);
safe_arith!(div, safe_div);

/// `a * b / c` with floor rounding
pub fn safe_mul_div(a: U256, b: U256, c: U256) -> CoreResult<U256> {
    safe_div(safe_mul(a, b)?, c)
}

/// Apply a basis-point factor: `value * bps / 10_000`
pub fn safe_calculate_bps(value: U256, bps: u32) -> CoreResult<U256> {
    safe_mul_div(value, U256::from(bps), U256::from(BPS_DENOMINATOR))
}

/// `a - b`, clamped at zero
pub fn saturating_delta(a: U256, b: U256) -> U256 {
    a.checked_sub(b).unwrap_or(U256::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_ops() {
        assert_eq!(safe_add(U256::new(2), U256::new(3)), Ok(U256::new(5)));
        assert_eq!(safe_add(U256::MAX, U256::ONE), Err(CoreError::MathOverflow));
        assert_eq!(safe_sub(U256::ONE, U256::new(2)), Err(CoreError::MathUnderflow));
        assert_eq!(safe_mul(U256::MAX, U256::new(2)), Err(CoreError::MathOverflow));
        assert_eq!(safe_div(U256::ONE, U256::ZERO), Err(CoreError::DivisionByZero));
    }

    #[test]
    fn test_mul_div_floors() {
        assert_eq!(safe_mul_div(U256::new(10), U256::new(10), U256::new(3)), Ok(U256::new(33)));
    }

    #[test]
    fn test_bps() {
        assert_eq!(safe_calculate_bps(U256::new(10_000), 50), Ok(U256::new(50)));
        assert_eq!(safe_calculate_bps(U256::new(199), 5_000), Ok(U256::new(99)));
    }

    #[test]
    fn test_saturating_delta() {
        assert_eq!(saturating_delta(U256::new(5), U256::new(7)), U256::ZERO);
        assert_eq!(saturating_delta(U256::new(7), U256::new(5)), U256::new(2));
    }
}
