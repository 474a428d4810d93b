//! # Ayin Core - Settlement Math and On-Chain Accounting
//!
//! Pure logic shared by every Ayin client surface. It provides:
//!
//! - Constant-product swap and liquidity math over 256-bit reserves
//! - Staking reward accrual from versioned on-chain snapshots
//! - Defensive decoding of ambiguous contract return values
//! - Alephium contract id and address encoding
//! - The code-hash registry that maps deployed contracts to protocols
//!
//! Nothing in this crate performs I/O.

pub mod codec;
pub mod constants;
pub mod errors;
pub mod math;
pub mod registry;
pub mod types;

// Re-export commonly used items
pub use constants::*;
pub use errors::{CoreError, CoreResult};
pub use ethnum::U256;
pub use registry::{FieldPosition, Protocol, Registry};
pub use types::*;
