//! The dynamic value produced by evaluating a data file.
//!
//! Lua has a single table type; here a table is decided once, at evaluation
//! time, to be either a [`Value::Sequence`] (only positional fields) or a
//! [`Value::Map`] (at least one keyed field).

use indexmap::IndexMap;
use std::hash::{Hash, Hasher};

/// Largest integer magnitude an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// An untyped value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    Text(String),
    /// 0-based, in declaration order.
    Sequence(Vec<Value>),
    /// Iterates in insertion order; equality ignores order.
    Map(IndexMap<Key, Value>),
}

/// A map key. Number keys treat `-0` and `0` as the same key.
#[derive(Debug, Clone)]
pub enum Key {
    Number(f64),
    Text(String),
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Number(a), Key::Number(b)) => a == b,
            (Key::Text(a), Key::Text(b)) => a == b,
            _ => false,
        }
    }
}

// NaN keys are rejected by the evaluator, so `eq` is reflexive for every key
// that can be built from source.
impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Key::Number(n) => {
                0u8.hash(state);
                let bits = if *n == 0.0 { 0 } else { n.to_bits() };
                bits.hash(state);
            }
            Key::Text(s) => {
                1u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl Key {
    /// A number key, or `None` for NaN.
    pub fn number(n: f64) -> Option<Key> {
        if n.is_nan() {
            None
        } else if n == 0.0 {
            Some(Key::Number(0.0))
        } else {
            Some(Key::Number(n))
        }
    }

    /// The key as it would appear as a JSON object key.
    pub fn to_json_key(&self) -> String {
        match self {
            Key::Number(n) => format_number(*n),
            Key::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Text(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Text(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Number(value as f64)
    }
}

fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER
}

fn format_number(n: f64) -> String {
    if is_integral(n) {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl Value {
    /// Name of the value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Text(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Map(_) => "map",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<Key, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a text key in a map. Returns `None` for non-maps.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?.get(&Key::Text(key.to_string()))
    }

    /// Convert to JSON. Integral numbers become JSON integers, map keys
    /// become strings, and non-finite numbers become `null`. Fails when two
    /// keys of one map render to the same string (`[1]` and `["1"]`).
    pub fn to_json(&self) -> Result<serde_json::Value, KeyCollision> {
        use serde_json::Value as Json;
        Ok(match self {
            Value::Nil => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) if is_integral(*n) => Json::from(*n as i64),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Text(s) => Json::String(s.clone()),
            Value::Sequence(items) => Json::Array(
                items
                    .iter()
                    .map(Value::to_json)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Value::Map(map) => {
                let mut object = serde_json::Map::with_capacity(map.len());
                for (key, value) in map {
                    let key = key.to_json_key();
                    if object.contains_key(&key) {
                        return Err(KeyCollision { key });
                    }
                    object.insert(key, value.to_json()?);
                }
                Json::Object(object)
            }
        })
    }
}

/// Two distinct keys of one table share a JSON key.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("table has both a number and a string key \"{key}\"")]
pub struct KeyCollision {
    pub key: String,
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Sequence(value)
    }
}

impl FromIterator<(Key, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().collect())
    }
}
