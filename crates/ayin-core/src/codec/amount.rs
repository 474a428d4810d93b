//! Fixed-point token amounts.
//!
//! Amounts are integers in smallest units everywhere in the core; decimals
//! only appear when formatting for people or parsing their input.

use crate::errors::{CoreError, CoreResult};
use ethnum::U256;

/// Parse a decimal or `0x`-prefixed hex integer
pub fn parse_u256(text: &str) -> CoreResult<U256> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => U256::from_str_radix(hex, 16),
        None => U256::from_str_radix(text, 10),
    };
    parsed.map_err(|_| CoreError::InvalidAmount(text.to_string()))
}

/// Render `amount` with `decimals` fractional digits, trailing zeros trimmed
pub fn format_units(amount: U256, decimals: u8) -> String {
    let digits = amount.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
    } else {
        digits
    };
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Parse a human amount such as `"1.5"` into smallest units
pub fn parse_units(text: &str, decimals: u8) -> CoreResult<U256> {
    let text = text.trim();
    let invalid = || CoreError::InvalidAmount(text.to_string());

    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if fraction.len() > decimals as usize {
        return Err(invalid());
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let mut digits = String::with_capacity(whole.len() + decimals as usize);
    digits.push_str(if whole.is_empty() { "0" } else { whole });
    digits.push_str(fraction);
    digits.push_str(&"0".repeat(decimals as usize - fraction.len()));
    U256::from_str_radix(&digits, 10).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_u256() {
        assert_eq!(parse_u256("42").unwrap(), U256::new(42));
        assert_eq!(parse_u256("0x2a").unwrap(), U256::new(42));
        assert!(matches!(parse_u256("4x2"), Err(CoreError::InvalidAmount(_))));
        assert!(parse_u256("").is_err());
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(U256::new(1_500_000_000_000_000_000), 18), "1.5");
        assert_eq!(format_units(U256::new(2_000_000_000_000_000), 18), "0.002");
        assert_eq!(format_units(U256::ZERO, 18), "0");
        assert_eq!(format_units(U256::new(42), 0), "42");
        assert_eq!(format_units(U256::new(42_000), 3), "42");
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_units("1.5", 18).unwrap(), U256::new(1_500_000_000_000_000_000));
        assert_eq!(parse_units("0.001", 18).unwrap(), U256::new(1_000_000_000_000_000));
        assert_eq!(parse_units("7", 2).unwrap(), U256::new(700));
        assert_eq!(parse_units(".5", 1).unwrap(), U256::new(5));
        assert!(parse_units("1.234", 2).is_err());
        assert!(parse_units("-1", 18).is_err());
        assert!(parse_units(".", 18).is_err());
    }
}
