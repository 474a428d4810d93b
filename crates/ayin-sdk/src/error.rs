//! SDK error types

use ayin_core::{CoreError, U256, MIN_ALPH_FOR_CLAIM_UNSTAKE, ONE_ALPH};
use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Pricing, decoding or registry failure
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Node or explorer request failed
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Node answered with a payload we could not interpret
    #[error("Unexpected node response: {0}")]
    NodeResponse(String),

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// No method index configured for a view call
    #[error("No method index configured for {contract}.{method}")]
    UnsupportedMethod { contract: String, method: String },

    /// Invalid parameters
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    // ========================================================================
    // Signer Rejections
    // ========================================================================

    /// Wallet has no account selected
    #[error("No account selected in signer")]
    NoAccountSelected,

    /// Staker has no StakingAccount sub-contract yet
    #[error("No staking account found for {0}")]
    NoStakingAccount(String),

    /// Signer lacks the ALPH the call must attach
    #[error("Insufficient ALPH for operation (needs {required}): {detail}")]
    InsufficientOperationalBalance { required: U256, detail: String },

    /// Contract received less of a token than it expected
    #[error("Insufficient approved balance: expected {expected}, got {got}, missing {missing}")]
    InsufficientApprovedBalance { expected: U256, got: U256, missing: U256 },

    /// Contract assertion failed during execution
    #[error("Contract assertion rejected the call: {0}")]
    AssertionRejected(String),

    /// Any other rejection, verbatim
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    /// Chained submission returned fewer or different results than steps
    #[error("Chained submission returned {got} results, expected {expected}")]
    ChainedResultMissing { expected: usize, got: usize },

    /// Illegal transaction lifecycle transition
    #[error("Invalid transaction stage transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

impl From<reqwest::Error> for SdkError {
    fn from(err: reqwest::Error) -> Self {
        SdkError::Rpc(err.to_string())
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::NodeResponse(err.to_string())
    }
}

impl From<std::io::Error> for SdkError {
    fn from(err: std::io::Error) -> Self {
        SdkError::Config(err.to_string())
    }
}

pub type SdkResult<T> = Result<T, SdkError>;

// ============================================================================
// Rejection Classification
// ============================================================================

const NOT_ENOUGH_APPROVED: &str = "Not enough approved balance";
const ASSERTION_FAILED: &str = "Assertion Failed";
const STAKE_DEPOSIT_EXPECTED: &str = "expected: 1000000000000000000";
const OPERATIONAL_ALPH_MARKERS: [&str; 3] = ["expected 0.002 ALPH", "expected 0.001 ALPH", "got 0 ALPH"];

/// What the caller knows about the rejected call
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectionContext<'a> {
    /// Contract the call targeted
    pub contract_address: Option<&'a str>,
    /// Token the call approved
    pub token_id: Option<&'a str>,
}

/// Amounts recovered from a "Not enough approved balance" message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovedShortfall {
    pub expected: U256,
    pub got: U256,
    pub missing: U256,
}

/// Parse a shortfall that names both the contract and the token. Messages
/// about other contracts or tokens are not ours to interpret.
pub fn parse_insufficient_approved(
    message: &str,
    contract_address: &str,
    token_id: &str,
) -> Option<ApprovedShortfall> {
    if !message.contains(NOT_ENOUGH_APPROVED) || !message.contains(contract_address) {
        return None;
    }
    if !message.to_lowercase().contains(&token_id.to_lowercase()) {
        return None;
    }
    let (expected, got) = find_expected_got(message)?;
    Some(ApprovedShortfall {
        expected,
        got,
        missing: expected.checked_sub(got).unwrap_or(U256::ZERO),
    })
}

/// First `expected[:] <n>, got[:] <m>` pair in the message
fn find_expected_got(message: &str) -> Option<(U256, U256)> {
    message
        .match_indices("expected")
        .find_map(|(start, keyword)| parse_expected_got_at(&message[start + keyword.len()..]))
}

fn parse_expected_got_at(rest: &str) -> Option<(U256, U256)> {
    let rest = skip_separator(rest, ':');
    let (expected, rest) = take_digits(rest)?;
    let rest = rest.trim_start().strip_prefix(',')?.trim_start();
    let rest = rest.strip_prefix("got")?;
    let rest = skip_separator(rest, ':');
    let (got, _) = take_digits(rest)?;
    Some((expected, got))
}

fn skip_separator(text: &str, separator: char) -> &str {
    let text = text.trim_start();
    text.strip_prefix(separator).unwrap_or(text).trim_start()
}

fn take_digits(text: &str) -> Option<(U256, &str)> {
    let end = text.find(|c: char| !c.is_ascii_digit()).unwrap_or(text.len());
    if end == 0 {
        return None;
    }
    let value = U256::from_str_radix(&text[..end], 10).ok()?;
    Some((value, &text[end..]))
}

/// Turn a signer or node rejection message into a structured error
pub fn classify_rejection(message: &str, ctx: &RejectionContext<'_>) -> SdkError {
    if let (Some(contract), Some(token)) = (ctx.contract_address, ctx.token_id) {
        if let Some(shortfall) = parse_insufficient_approved(message, contract, token) {
            return SdkError::InsufficientApprovedBalance {
                expected: shortfall.expected,
                got: shortfall.got,
                missing: shortfall.missing,
            };
        }
    }

    // An approved-balance complaint that does not name the target contract is
    // about the ALPH deposit for the StakingAccount
    let names_target = ctx
        .contract_address
        .map(|address| message.contains(address))
        .unwrap_or(false);
    if message.contains(STAKE_DEPOSIT_EXPECTED) || (message.contains(NOT_ENOUGH_APPROVED) && !names_target) {
        return SdkError::InsufficientOperationalBalance {
            required: ONE_ALPH,
            detail: message.to_string(),
        };
    }

    if OPERATIONAL_ALPH_MARKERS.iter().any(|marker| message.contains(marker)) {
        return SdkError::InsufficientOperationalBalance {
            required: MIN_ALPH_FOR_CLAIM_UNSTAKE,
            detail: message.to_string(),
        };
    }

    if message.contains(ASSERTION_FAILED) {
        return SdkError::AssertionRejected(message.to_string());
    }

    SdkError::Rejected(message.to_string())
}

impl SdkError {
    /// Whether the request was refused locally for bad input
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, SdkError::Core(e) if e.is_input_error())
    }

    /// Whether this is a rejection the user can fix by funding their wallet
    pub fn is_funding_problem(&self) -> bool {
        matches!(
            self,
            SdkError::InsufficientOperationalBalance { .. } | SdkError::InsufficientApprovedBalance { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAKING: &str = "tuuAwnJNwxew6chSHV74CW9Er18EE925Ss2fQMmZbWtF";
    const AYIN: &str = "1a281053ba8601a658368594da034c2e99a0fb951b86498d05e76aedfe666800";

    fn shortfall_message() -> String {
        format!(
            "VM execution error: {} of contract {}: tokenId: {}, expected: 5000, got: 1200",
            NOT_ENOUGH_APPROVED,
            STAKING,
            AYIN.to_uppercase()
        )
    }

    #[test]
    fn test_parse_insufficient_approved() {
        let parsed = parse_insufficient_approved(&shortfall_message(), STAKING, AYIN).unwrap();
        assert_eq!(parsed.expected, U256::new(5_000));
        assert_eq!(parsed.got, U256::new(1_200));
        assert_eq!(parsed.missing, U256::new(3_800));
    }

    #[test]
    fn test_parse_requires_contract_and_token() {
        assert!(parse_insufficient_approved(&shortfall_message(), "otherContract", AYIN).is_none());
        assert!(parse_insufficient_approved(&shortfall_message(), STAKING, &"0".repeat(64)).is_none());
        let without_amounts = format!("{} {} {}", NOT_ENOUGH_APPROVED, STAKING, AYIN);
        assert!(parse_insufficient_approved(&without_amounts, STAKING, AYIN).is_none());
    }

    #[test]
    fn test_expected_got_spacing_variants() {
        assert_eq!(
            find_expected_got("expected 10 , got 3"),
            Some((U256::new(10), U256::new(3)))
        );
        assert_eq!(
            find_expected_got("expected ALPH; expected:7,got:9"),
            Some((U256::new(7), U256::new(9)))
        );
        assert_eq!(find_expected_got("expected: x, got: 1"), None);
    }

    #[test]
    fn test_missing_saturates() {
        let message = format!("{} {} {} expected: 1, got: 5", NOT_ENOUGH_APPROVED, STAKING, AYIN);
        let parsed = parse_insufficient_approved(&message, STAKING, AYIN).unwrap();
        assert_eq!(parsed.missing, U256::ZERO);
    }

    #[test]
    fn test_classify_approved_shortfall() {
        let ctx = RejectionContext { contract_address: Some(STAKING), token_id: Some(AYIN) };
        let err = classify_rejection(&shortfall_message(), &ctx);
        assert!(matches!(err, SdkError::InsufficientApprovedBalance { .. }));
        assert!(err.is_funding_problem());
    }

    #[test]
    fn test_classify_stake_deposit() {
        let ctx = RejectionContext { contract_address: Some(STAKING), token_id: None };
        let err = classify_rejection("Not enough approved balance for address abc", &ctx);
        assert!(matches!(
            err,
            SdkError::InsufficientOperationalBalance { required, .. } if required == ONE_ALPH
        ));

        let err = classify_rejection("expected: 1000000000000000000, got: 0", &RejectionContext::default());
        assert!(matches!(err, SdkError::InsufficientOperationalBalance { .. }));
    }

    #[test]
    fn test_classify_operational_alph() {
        let err = classify_rejection("Insufficient funds: expected 0.002 ALPH", &RejectionContext::default());
        assert!(matches!(
            err,
            SdkError::InsufficientOperationalBalance { required, .. } if required == MIN_ALPH_FOR_CLAIM_UNSTAKE
        ));
    }

    #[test]
    fn test_classify_assertion_and_other() {
        let ctx = RejectionContext::default();
        assert!(matches!(
            classify_rejection("Assertion Failed in Contract @ 1234", &ctx),
            SdkError::AssertionRejected(_)
        ));
        assert!(matches!(classify_rejection("user rejected", &ctx), SdkError::Rejected(_)));
    }
}
