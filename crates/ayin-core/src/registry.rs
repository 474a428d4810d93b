//! # Version Registry
//!
//! Maps deployed contract code hashes to the protocol they implement. Several
//! deployments of the same protocol differ only in their hash, so a hash can be
//! registered as an alias of a protocol without becoming its canonical hash.
//! A hash can also record where its contract keeps the owner address, since
//! node state carries field values without their names.
//!
//! The registry is built once at startup and only read afterwards; share it
//! behind an `Arc`.

use crate::errors::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Closed set of contract protocols the client understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    /// TokenPair V1 pool
    PoolV1,
    /// Staking with inline account data
    StakingV2,
    /// Staking with a StakingAccount sub-contract per participant
    StakingV4,
}

impl Protocol {
    pub fn is_staking(&self) -> bool {
        matches!(self, Protocol::StakingV2 | Protocol::StakingV4)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Protocol::PoolV1 => "PoolV1",
            Protocol::StakingV2 => "StakingV2",
            Protocol::StakingV4 => "StakingV4",
        };
        f.write_str(name)
    }
}

/// Position of a field in contract state. Immutable and mutable fields are
/// numbered separately, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldPosition {
    #[serde(default)]
    pub mutable: bool,
    pub index: usize,
}

impl FieldPosition {
    pub fn immutable(index: usize) -> Self {
        Self { mutable: false, index }
    }

    pub fn mutable(index: usize) -> Self {
        Self { mutable: true, index }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    protocol: Protocol,
    alias: bool,
    owner_field: Option<FieldPosition>,
}

/// Code hash to protocol lookup
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: HashMap<String, Entry>,
}

/// Lower-case hex without `0x`
pub fn normalize_fingerprint(fingerprint: &str) -> String {
    let trimmed = fingerprint.trim();
    trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
        .to_ascii_lowercase()
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the canonical hash of a protocol
    pub fn register(&mut self, fingerprint: &str, protocol: Protocol) -> CoreResult<()> {
        self.insert(fingerprint, Entry { protocol, alias: false, owner_field: None })
    }

    /// Register an additional deployment hash of a protocol
    pub fn register_alias(&mut self, fingerprint: &str, protocol: Protocol) -> CoreResult<()> {
        self.insert(fingerprint, Entry { protocol, alias: true, owner_field: None })
    }

    fn insert(&mut self, fingerprint: &str, entry: Entry) -> CoreResult<()> {
        let key = normalize_fingerprint(fingerprint);
        if key.is_empty() {
            return Err(CoreError::InvalidInput("empty fingerprint"));
        }
        if self.entries.contains_key(&key) {
            return Err(CoreError::DuplicateRegistration(key));
        }
        self.entries.insert(key, entry);
        Ok(())
    }

    /// Record where contracts with this hash keep their owner
    pub fn set_owner_field(&mut self, fingerprint: &str, position: FieldPosition) -> CoreResult<()> {
        let key = normalize_fingerprint(fingerprint);
        match self.entries.get_mut(&key) {
            Some(entry) => {
                entry.owner_field = Some(position);
                Ok(())
            }
            None => Err(CoreError::UnknownContract(key)),
        }
    }

    pub fn owner_field(&self, fingerprint: &str) -> Option<FieldPosition> {
        self.entries
            .get(&normalize_fingerprint(fingerprint))
            .and_then(|entry| entry.owner_field)
    }

    pub fn resolve(&self, fingerprint: &str) -> CoreResult<Protocol> {
        let key = normalize_fingerprint(fingerprint);
        self.entries
            .get(&key)
            .map(|entry| entry.protocol)
            .ok_or(CoreError::UnknownContract(key))
    }

    pub fn is_alias(&self, fingerprint: &str) -> bool {
        self.entries
            .get(&normalize_fingerprint(fingerprint))
            .map(|entry| entry.alias)
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{STAKING_V2_HASH, STAKING_V4_ALIAS_A, STAKING_V4_ALIAS_B};

    fn staking_registry() -> Registry {
        let mut registry = Registry::new();
        registry.register(STAKING_V2_HASH, Protocol::StakingV2).unwrap();
        registry.register_alias(STAKING_V4_ALIAS_A, Protocol::StakingV4).unwrap();
        registry.register_alias(STAKING_V4_ALIAS_B, Protocol::StakingV4).unwrap();
        registry
    }

    #[test]
    fn test_alias_resolves_to_protocol() {
        let registry = staking_registry();
        assert_eq!(registry.resolve(STAKING_V4_ALIAS_A), Ok(Protocol::StakingV4));
        assert_eq!(registry.resolve(STAKING_V4_ALIAS_B), Ok(Protocol::StakingV4));
        assert_eq!(registry.resolve(STAKING_V2_HASH), Ok(Protocol::StakingV2));
        assert!(registry.is_alias(STAKING_V4_ALIAS_A));
        assert!(!registry.is_alias(STAKING_V2_HASH));
    }

    #[test]
    fn test_unknown_fingerprint() {
        let registry = staking_registry();
        let res = registry.resolve(&"ab".repeat(32));
        assert_eq!(res, Err(CoreError::UnknownContract("ab".repeat(32))));
    }

    #[test]
    fn test_fingerprint_normalization() {
        let mut registry = Registry::new();
        registry.register("0xABCDEF", Protocol::PoolV1).unwrap();
        assert_eq!(registry.resolve("abcdef"), Ok(Protocol::PoolV1));
        assert_eq!(registry.resolve(" 0xAbCdEf "), Ok(Protocol::PoolV1));
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = Registry::new();
        registry.register("aa", Protocol::StakingV4).unwrap();
        assert_eq!(
            registry.register_alias("AA", Protocol::StakingV2),
            Err(CoreError::DuplicateRegistration("aa".into()))
        );
        assert_eq!(registry.resolve("aa"), Ok(Protocol::StakingV4));
        assert!(registry.register("", Protocol::PoolV1).is_err());
    }

    #[test]
    fn test_owner_field_per_hash() {
        let mut registry = staking_registry();
        assert_eq!(registry.owner_field(STAKING_V4_ALIAS_A), None);

        registry
            .set_owner_field(&STAKING_V4_ALIAS_A.to_uppercase(), FieldPosition::mutable(2))
            .unwrap();
        assert_eq!(registry.owner_field(STAKING_V4_ALIAS_A), Some(FieldPosition::mutable(2)));
        assert_eq!(registry.owner_field(STAKING_V4_ALIAS_B), None);
        assert_eq!(registry.resolve(STAKING_V4_ALIAS_A), Ok(Protocol::StakingV4));

        assert_eq!(
            registry.set_owner_field("cd", FieldPosition::immutable(0)),
            Err(CoreError::UnknownContract("cd".into()))
        );
    }

    #[test]
    fn test_protocol_classification() {
        assert!(Protocol::StakingV2.is_staking());
        assert!(!Protocol::PoolV1.is_staking());
        assert_eq!(Protocol::StakingV4.to_string(), "StakingV4");
    }
}
