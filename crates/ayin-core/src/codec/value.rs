//! Node values and loosely-shaped contract returns.
//!
//! The node speaks typed `Val`s. Depending on the contract version the same
//! view method can return a scalar, a tuple, a struct or a raw byte vector,
//! so callers decode through `RawValue` instead of assuming a shape.

use crate::codec::amount::parse_u256;
use ethnum::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Typed value as exchanged with the Alephium node API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Val {
    Bool(bool),
    I256(String),
    U256(String),
    ByteVec(String),
    Address(String),
}

impl Val {
    pub fn u256(value: U256) -> Self {
        Val::U256(value.to_string())
    }

    pub fn address(address: impl Into<String>) -> Self {
        Val::Address(address.into())
    }

    pub fn byte_vec(hex: impl Into<String>) -> Self {
        Val::ByteVec(hex.into())
    }

    /// Address payload, if this is an `Address` value
    pub fn as_address(&self) -> Option<&str> {
        match self {
            Val::Address(a) => Some(a),
            _ => None,
        }
    }

    /// Numeric payload of a `U256` value
    pub fn as_u256(&self) -> Option<U256> {
        match self {
            Val::U256(v) => parse_u256(v).ok(),
            _ => None,
        }
    }
}

impl From<Val> for RawValue {
    fn from(val: Val) -> Self {
        match val {
            Val::U256(v) => match parse_u256(&v) {
                Ok(n) => RawValue::Scalar(n),
                Err(_) => RawValue::Text(v),
            },
            Val::Bool(b) => RawValue::Text(b.to_string()),
            Val::I256(v) | Val::ByteVec(v) | Val::Address(v) => RawValue::Text(v),
        }
    }
}

/// Contract return value of unknown shape
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RawValue {
    #[default]
    Null,
    Scalar(U256),
    Text(String),
    Array(Vec<RawValue>),
    Struct(BTreeMap<String, RawValue>),
}

impl RawValue {
    /// Collapse a node `returns` list: one value stays a value, several
    /// become an array, none is `Null`
    pub fn from_returns(returns: Vec<Val>) -> Self {
        let mut values: Vec<RawValue> = returns.into_iter().map(RawValue::from).collect();
        match values.len() {
            0 => RawValue::Null,
            1 => values.remove(0),
            _ => RawValue::Array(values),
        }
    }

    /// Convert loosely-typed JSON, keeping decimal strings as text
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawValue::Null,
            serde_json::Value::Bool(b) => RawValue::Text(b.to_string()),
            serde_json::Value::Number(n) => match n.as_u64() {
                Some(v) => RawValue::Scalar(U256::from(v)),
                None => RawValue::Text(n.to_string()),
            },
            serde_json::Value::String(s) => RawValue::Text(s.clone()),
            serde_json::Value::Array(items) => {
                RawValue::Array(items.iter().map(RawValue::from_json).collect())
            }
            serde_json::Value::Object(map) => RawValue::Struct(
                map.iter()
                    .map(|(k, v)| (k.clone(), RawValue::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Integer reading of a scalar, or of text holding a decimal / `0x` number
    pub fn as_u256(&self) -> Option<U256> {
        match self {
            RawValue::Scalar(v) => Some(*v),
            RawValue::Text(s) => parse_u256(s).ok(),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&RawValue> {
        match self {
            RawValue::Struct(map) => map.get(name),
            _ => None,
        }
    }

    pub fn element(&self, index: usize) -> Option<&RawValue> {
        match self {
            RawValue::Array(items) => items.get(index),
            _ => None,
        }
    }

    /// First element of an array, or the value itself
    pub fn first(&self) -> &RawValue {
        match self {
            RawValue::Array(items) => items.first().unwrap_or(&RawValue::Null),
            other => other,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }
}
