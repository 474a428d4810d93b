//! Staked-amount extraction.
//!
//! `getStakingAccount` answers differently per staking version: a tuple, a
//! struct or a raw byte vector. Each shape has one extractor that yields a
//! primary candidate and an optional fallback. The decoder tries extractors in
//! order and returns the first candidate within the sanity bound. Anything
//! else, bare numbers and text shorter than one word included, decodes to zero.

use crate::codec::value::RawValue;
use crate::constants::DEFAULT_SANITY_BOUND;
use ethnum::U256;

/// Hex characters in one 32-byte word
const WORD_HEX_LEN: usize = 64;

/// Candidates produced by one extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidates {
    pub primary: Option<U256>,
    pub fallback: Option<U256>,
}

impl Candidates {
    fn pick(&self, bound: U256) -> Option<U256> {
        self.primary
            .filter(|v| *v <= bound)
            .or_else(|| self.fallback.filter(|v| *v <= bound))
    }
}

/// Extractor for one return shape; `None` means the shape does not apply
pub type Extractor = fn(&RawValue) -> Option<Candidates>;

/// Tuple form: `[amountStaked, rewardPerTokenPaid, ...]`
pub fn from_array(raw: &RawValue) -> Option<Candidates> {
    let RawValue::Array(items) = raw else {
        return None;
    };
    Some(Candidates {
        primary: Some(items.first().and_then(RawValue::as_u256).unwrap_or(U256::ZERO)),
        fallback: Some(items.get(1).and_then(RawValue::as_u256).unwrap_or(U256::ZERO)),
    })
}

/// Struct form: `amount` (or `amountStaked`), then `rewardPerTokenPaid`
pub fn from_struct(raw: &RawValue) -> Option<Candidates> {
    let RawValue::Struct(_) = raw else {
        return None;
    };
    let amount = raw.field("amount").or_else(|| raw.field("amountStaked"));
    Some(Candidates {
        primary: Some(amount.and_then(RawValue::as_u256).unwrap_or(U256::ZERO)),
        fallback: Some(
            raw.field("rewardPerTokenPaid")
                .and_then(RawValue::as_u256)
                .unwrap_or(U256::ZERO),
        ),
    })
}

/// Raw byte vector: first 32-byte word, then the second when present
pub fn from_byte_vec(raw: &RawValue) -> Option<Candidates> {
    let text = raw.as_text()?;
    let hex = text.strip_prefix("0x").unwrap_or(text);
    if hex.len() < WORD_HEX_LEN || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let word = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|w| U256::from_str_radix(w, 16).ok())
    };
    Some(Candidates {
        primary: word(0..WORD_HEX_LEN),
        fallback: if hex.len() >= 2 * WORD_HEX_LEN {
            word(WORD_HEX_LEN..2 * WORD_HEX_LEN)
        } else {
            None
        },
    })
}

/// Ordered extraction pipeline with a sanity bound
#[derive(Debug, Clone)]
pub struct StakedAmountDecoder {
    bound: U256,
    strategies: Vec<(&'static str, Extractor)>,
}

impl Default for StakedAmountDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_SANITY_BOUND)
    }
}

impl StakedAmountDecoder {
    pub fn new(bound: U256) -> Self {
        Self {
            bound,
            strategies: vec![
                ("array", from_array as Extractor),
                ("struct", from_struct as Extractor),
                ("byte_vec", from_byte_vec as Extractor),
            ],
        }
    }

    pub fn bound(&self) -> U256 {
        self.bound
    }

    /// Name of the first strategy whose shape matches, for diagnostics
    pub fn matching_strategy(&self, raw: &RawValue) -> Option<&'static str> {
        self.strategies
            .iter()
            .find(|(_, extract)| extract(raw).is_some())
            .map(|(name, _)| *name)
    }

    /// Staked amount, or zero when no candidate lies within the bound
    pub fn decode(&self, raw: &RawValue) -> U256 {
        self.strategies
            .iter()
            .filter_map(|(_, extract)| extract(raw))
            .find_map(|candidates| candidates.pick(self.bound))
            .unwrap_or(U256::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn big(digits: &str) -> U256 {
        U256::from_str_radix(digits, 10).unwrap()
    }

    fn structure(fields: &[(&str, U256)]) -> RawValue {
        RawValue::Struct(
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), RawValue::Scalar(*v)))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[test]
    fn test_struct_amount_within_bound() {
        let raw = structure(&[
            ("amount", big("500000000000000000000000")),
            ("rewardPerTokenPaid", big("9000000000000000000000000000000")),
        ]);
        assert_eq!(StakedAmountDecoder::default().decode(&raw), big("500000000000000000000000"));
    }

    #[test]
    fn test_struct_falls_back_to_second_field() {
        let raw = structure(&[
            ("amountStaked", big("9000000000000000000000000000000")),
            ("rewardPerTokenPaid", U256::new(77)),
        ]);
        assert_eq!(StakedAmountDecoder::default().decode(&raw), U256::new(77));
    }

    #[test]
    fn test_struct_both_out_of_bound() {
        let huge = big("9000000000000000000000000000000");
        let raw = structure(&[("amount", huge), ("rewardPerTokenPaid", huge)]);
        assert_eq!(StakedAmountDecoder::default().decode(&raw), U256::ZERO);
    }

    #[test]
    fn test_array_shape() {
        let raw = RawValue::Array(vec![RawValue::Scalar(U256::new(12)), RawValue::Scalar(U256::MAX)]);
        assert_eq!(StakedAmountDecoder::default().decode(&raw), U256::new(12));

        let swapped = RawValue::Array(vec![RawValue::Scalar(U256::MAX), RawValue::Scalar(U256::new(12))]);
        assert_eq!(StakedAmountDecoder::default().decode(&swapped), U256::new(12));
    }

    #[test]
    fn test_byte_vec_words() {
        let first = format!("{:064x}", 1_000u32);
        let second = format!("{:064x}", 2_000u32);
        let raw = RawValue::Text(format!("{}{}", first, second));
        assert_eq!(StakedAmountDecoder::default().decode(&raw), U256::new(1_000));

        let raw = RawValue::Text(format!("0x{}{}", "f".repeat(64), second));
        assert_eq!(StakedAmountDecoder::default().decode(&raw), U256::new(2_000));

        let raw = RawValue::Text("f".repeat(64));
        assert_eq!(StakedAmountDecoder::default().decode(&raw), U256::ZERO);
    }

    #[test]
    fn test_short_text_and_null() {
        let decoder = StakedAmountDecoder::default();
        assert_eq!(decoder.decode(&RawValue::Null), U256::ZERO);
        assert_eq!(decoder.decode(&RawValue::Text("not a number".into())), U256::ZERO);
        assert_eq!(decoder.decode(&RawValue::Text("1234".into())), U256::ZERO);
        assert_eq!(decoder.decode(&RawValue::Text("0x12".into())), U256::ZERO);
        assert_eq!(decoder.matching_strategy(&RawValue::Text("1234".into())), None);
    }

    #[test]
    fn test_bare_number_decodes_to_zero() {
        let decoder = StakedAmountDecoder::default();
        assert_eq!(decoder.decode(&RawValue::Scalar(U256::new(1_234))), U256::ZERO);
        assert_eq!(decoder.matching_strategy(&RawValue::Scalar(U256::ONE)), None);
    }

    #[test]
    fn test_bound_is_inclusive() {
        let decoder = StakedAmountDecoder::new(U256::new(100));
        let at_bound = RawValue::Array(vec![RawValue::Scalar(U256::new(100)), RawValue::Scalar(U256::new(5))]);
        assert_eq!(decoder.decode(&at_bound), U256::new(100));
        let above = RawValue::Array(vec![RawValue::Scalar(U256::new(101)), RawValue::Scalar(U256::new(5))]);
        assert_eq!(decoder.decode(&above), U256::new(5));
    }

    #[test]
    fn test_matching_strategy() {
        let decoder = StakedAmountDecoder::default();
        assert_eq!(decoder.matching_strategy(&RawValue::Array(vec![])), Some("array"));
        assert_eq!(decoder.matching_strategy(&RawValue::Text("a".repeat(64))), Some("byte_vec"));
        assert_eq!(decoder.matching_strategy(&RawValue::Null), None);
    }
}
