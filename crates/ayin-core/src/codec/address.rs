//! Alephium identifiers.
//!
//! An address is base58 over a one-byte kind prefix and a 32-byte payload.
//! Contract addresses carry the contract id; P2PKH addresses carry the
//! blake2b-256 hash of a compressed secp256k1 public key.

use crate::constants::{CONTRACT_ID_HEX_LEN, TOTAL_GROUPS};
use crate::errors::{CoreError, CoreResult};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

type Blake2b256 = Blake2b<U32>;

/// Length of a compressed secp256k1 public key
pub const PUBLIC_KEY_LEN: usize = 33;

/// Unlock script discriminator for pay-to-public-key-hash inputs
pub const P2PKH_UNLOCK_PREFIX: u8 = 0x00;

// ============================================================================
// Address
// ============================================================================

/// Lockup script kind encoded in the first address byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AddressKind {
    P2PKH,
    P2MPKH,
    P2SH,
    Contract,
}

impl AddressKind {
    pub fn prefix(self) -> u8 {
        match self {
            AddressKind::P2PKH => 0x00,
            AddressKind::P2MPKH => 0x01,
            AddressKind::P2SH => 0x02,
            AddressKind::Contract => 0x03,
        }
    }

    fn from_prefix(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(AddressKind::P2PKH),
            0x01 => Some(AddressKind::P2MPKH),
            0x02 => Some(AddressKind::P2SH),
            0x03 => Some(AddressKind::Contract),
            _ => None,
        }
    }
}

/// Validated base58 address
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address {
    text: String,
    kind: AddressKind,
}

impl Address {
    pub fn parse(text: &str) -> CoreResult<Self> {
        let text = text.trim();
        let bytes = decode_base58(text)?;
        let kind = AddressKind::from_prefix(bytes[0])
            .ok_or_else(|| CoreError::MalformedAddress(text.to_string()))?;
        // Multisig addresses have a variable length body
        if kind != AddressKind::P2MPKH && bytes.len() != 33 {
            return Err(CoreError::MalformedAddress(text.to_string()));
        }
        Ok(Self { text: text.to_string(), kind })
    }

    fn from_payload(kind: AddressKind, payload: &[u8; 32]) -> Self {
        let mut bytes = Vec::with_capacity(33);
        bytes.push(kind.prefix());
        bytes.extend_from_slice(payload);
        Self { text: bs58::encode(bytes).into_string(), kind }
    }

    pub fn kind(&self) -> AddressKind {
        self.kind
    }

    pub fn is_contract(&self) -> bool {
        self.kind() == AddressKind::Contract
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

fn decode_base58(text: &str) -> CoreResult<Vec<u8>> {
    let bytes = bs58::decode(text)
        .into_vec()
        .map_err(|_| CoreError::MalformedAddress(text.to_string()))?;
    if bytes.is_empty() {
        return Err(CoreError::MalformedAddress(text.to_string()));
    }
    Ok(bytes)
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Address {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Address::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.text
    }
}

// ============================================================================
// Contract Id
// ============================================================================

/// 32-byte contract id, also the id of the token a contract issues
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContractId([u8; 32]);

impl ContractId {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Decode exactly 64 hex characters, optionally `0x`-prefixed
    pub fn from_hex(text: &str) -> CoreResult<Self> {
        let hex_text = text.strip_prefix("0x").unwrap_or(text);
        if hex_text.len() != CONTRACT_ID_HEX_LEN {
            return Err(CoreError::malformed_reference(text));
        }
        let bytes = hex::decode(hex_text).map_err(|_| CoreError::malformed_reference(text))?;
        let mut id = [0u8; 32];
        id.copy_from_slice(&bytes);
        Ok(Self(id))
    }

    /// Whether `text` looks like a contract reference
    pub fn is_reference(text: &str) -> bool {
        Self::from_hex(text).is_ok()
    }

    pub fn from_address(address: &Address) -> CoreResult<Self> {
        let bytes = decode_base58(address.as_str())?;
        if bytes[0] != AddressKind::Contract.prefix() || bytes.len() != 33 {
            return Err(CoreError::MalformedAddress(address.to_string()));
        }
        let mut id = [0u8; 32];
        id.copy_from_slice(&bytes[1..]);
        Ok(Self(id))
    }

    pub fn to_address(&self) -> Address {
        Address::from_payload(AddressKind::Contract, &self.0)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Address group the contract lives in, carried by the last id byte
    pub fn group(&self) -> u8 {
        self.0[31] % TOTAL_GROUPS
    }
}

impl fmt::Debug for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContractId({})", self.to_hex())
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ============================================================================
// Public Key
// ============================================================================

/// Compressed secp256k1 public key
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    pub fn from_hex(text: &str) -> CoreResult<Self> {
        let hex_text = text.trim().trim_matches('"');
        let hex_text = hex_text.strip_prefix("0x").unwrap_or(hex_text);
        let bytes = hex::decode(hex_text).map_err(|_| CoreError::MalformedPublicKey(text.to_string()))?;
        Self::from_slice(&bytes).ok_or_else(|| CoreError::MalformedPublicKey(text.to_string()))
    }

    fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != PUBLIC_KEY_LEN || !matches!(bytes[0], 0x02 | 0x03) {
            return None;
        }
        let mut key = [0u8; PUBLIC_KEY_LEN];
        key.copy_from_slice(bytes);
        Some(Self(key))
    }

    /// Key carried by a P2PKH unlock script: `0x00 || pubkey`
    pub fn from_unlock_script(script_hex: &str) -> Option<Self> {
        let bytes = hex::decode(script_hex.strip_prefix("0x").unwrap_or(script_hex)).ok()?;
        let (prefix, rest) = bytes.split_first()?;
        if *prefix != P2PKH_UNLOCK_PREFIX || rest.len() < PUBLIC_KEY_LEN {
            return None;
        }
        Self::from_slice(&rest[..PUBLIC_KEY_LEN])
    }

    /// P2PKH address locked to this key
    pub fn to_p2pkh_address(&self) -> Address {
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&Blake2b256::digest(self.0));
        Address::from_payload(AddressKind::P2PKH, &hash)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTER_ADDRESS: &str = "vj1SmG6q4gMTA5dRB9TB4pJfyBXdTSNRFbJu2CC38Jw9";
    const ROUTER_ID: &str = "1e3e4da6d35ddd6c8b4a30c5a580273b1892a14d7540fba5fa8825ce0a046000";

    #[test]
    fn test_contract_id_to_address() {
        let id = ContractId::from_hex(ROUTER_ID).unwrap();
        assert_eq!(id.to_address().as_str(), ROUTER_ADDRESS);
        assert!(id.to_address().is_contract());
        assert_eq!(id.group(), 0);
        assert_eq!(ContractId::new([7u8; 32]).group(), 3);
    }

    #[test]
    fn test_contract_address_round_trip() {
        let address = Address::parse(ROUTER_ADDRESS).unwrap();
        let id = ContractId::from_address(&address).unwrap();
        assert_eq!(id.to_hex(), ROUTER_ID);
        assert_eq!(ContractId::from_hex(&format!("0x{}", ROUTER_ID)).unwrap(), id);
    }

    #[test]
    fn test_malformed_reference() {
        assert!(matches!(ContractId::from_hex("abcd"), Err(CoreError::MalformedReference(_))));
        assert!(matches!(
            ContractId::from_hex(&"zz".repeat(32)),
            Err(CoreError::MalformedReference(_))
        ));
        assert!(!ContractId::is_reference(&"0".repeat(63)));
        assert!(ContractId::is_reference(&"A".repeat(64)));
    }

    #[test]
    fn test_address_validation() {
        assert!(Address::parse("1DHQcZ2GXvZxETD32CjLEuzirreGiY2XAGX4BH86SasT").is_ok());
        assert!(matches!(Address::parse("0OIl"), Err(CoreError::MalformedAddress(_))));
        assert!(matches!(Address::parse(""), Err(CoreError::MalformedAddress(_))));
        let wallet = Address::parse("1DHQcZ2GXvZxETD32CjLEuzirreGiY2XAGX4BH86SasT").unwrap();
        assert_eq!(wallet.kind(), AddressKind::P2PKH);
        assert!(ContractId::from_address(&wallet).is_err());
    }

    #[test]
    fn test_p2pkh_derivation() {
        let key = PublicKey::from_hex(&format!("02{}", "11".repeat(32))).unwrap();
        assert_eq!(
            key.to_p2pkh_address().as_str(),
            "175NVpbiPG5MAK4BfcDAq7r17G87bFeNrv7997r4an2Wb"
        );
    }

    #[test]
    fn test_unlock_script_extraction() {
        let key_hex = format!("03{}", "ab".repeat(32));
        let script = format!("00{}", key_hex);
        let key = PublicKey::from_unlock_script(&script).unwrap();
        assert_eq!(key.to_hex(), key_hex);

        // P2SH / multisig scripts are not P2PKH
        assert!(PublicKey::from_unlock_script(&format!("01{}", key_hex)).is_none());
        assert!(PublicKey::from_unlock_script("00abcd").is_none());
        assert!(PublicKey::from_unlock_script("").is_none());
    }

    #[test]
    fn test_address_serde() {
        let address: Address = serde_json::from_str(&format!("\"{}\"", ROUTER_ADDRESS)).unwrap();
        assert_eq!(serde_json::to_string(&address).unwrap(), format!("\"{}\"", ROUTER_ADDRESS));
        assert!(serde_json::from_str::<Address>("\"not-base58-0\"").is_err());
    }
}
