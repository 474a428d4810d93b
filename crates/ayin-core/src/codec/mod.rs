//! # Codec
//!
//! Encoding and decoding between on-chain representations and typed values:
//! - `value`: node return values and the loose `RawValue` shape
//! - `amount`: fixed-point token amounts
//! - `staked`: defensive staked-amount extraction
//! - `address`: contract ids, addresses, public keys

pub mod address;
pub mod amount;
pub mod staked;
pub mod value;

pub use address::{Address, AddressKind, ContractId, PublicKey};
pub use amount::{format_units, parse_u256, parse_units};
pub use staked::StakedAmountDecoder;
pub use value::{RawValue, Val};
