//! # Core Error Types
//!
//! Errors raised by pure pricing, decoding and registry logic. Network and
//! signer failures live in the SDK and wrap these.

use thiserror::Error;

/// Core errors shared by every client surface
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    // ========================================================================
    // Math Errors
    // ========================================================================

    #[error("Math overflow")]
    MathOverflow,

    #[error("Math underflow")]
    MathUnderflow,

    #[error("Division by zero")]
    DivisionByZero,

    // ========================================================================
    // Validation Errors
    // ========================================================================

    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("Requested output {requested} is not below reserve {reserve}")]
    OutputExceedsReserve { requested: String, reserve: String },

    #[error("Token {0} is not part of this pair")]
    TokenNotInPair(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    // ========================================================================
    // Encoding Errors
    // ========================================================================

    #[error("Malformed contract reference: {0}")]
    MalformedReference(String),

    #[error("Malformed address: {0}")]
    MalformedAddress(String),

    #[error("Malformed public key: {0}")]
    MalformedPublicKey(String),

    // ========================================================================
    // Registry Errors
    // ========================================================================

    #[error("Unknown contract fingerprint: {0}")]
    UnknownContract(String),

    #[error("Fingerprint {0} is already registered")]
    DuplicateRegistration(String),
}

/// Result type using core errors
pub type CoreResult<T> = Result<T, CoreError>;

// Helper functions for creating specific errors
impl CoreError {
    /// Create an output-exceeds-reserve error
    pub fn output_exceeds_reserve(requested: ethnum::U256, reserve: ethnum::U256) -> Self {
        Self::OutputExceedsReserve {
            requested: requested.to_string(),
            reserve: reserve.to_string(),
        }
    }

    /// Create a malformed reference error from the offending text
    pub fn malformed_reference(value: impl Into<String>) -> Self {
        Self::MalformedReference(value.into())
    }

    /// Whether this error means the caller supplied bad arguments, as opposed
    /// to the chain returning something unexpected
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_)
                | Self::OutputExceedsReserve { .. }
                | Self::TokenNotInPair(_)
                | Self::InvalidAmount(_)
        )
    }
}
