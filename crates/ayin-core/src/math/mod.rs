//! # Mathematical Functions
//!
//! Pure 256-bit arithmetic for pricing and reward accounting:
//! - Overflow-checked primitives
//! - Constant-product swap and liquidity math
//! - Reward-per-token accrual

pub mod amm;
pub mod reward;
pub mod safe_math;

pub use amm::*;
pub use reward::*;
pub use safe_math::*;
