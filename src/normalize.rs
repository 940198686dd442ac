//! Response normalizer: raw contract return values to plain JSON trees.
//!
//! Contract calls return scalars, arrays, or arbitrarily nested associative
//! structures. Depending on the transport an associative value may arrive as
//! an ordered map with non-string keys ([`RawValue::Map`]) or as a plain keyed
//! object ([`RawValue::Object`]). [`normalize`] folds every `Map` into an
//! `Object` at any depth and leaves everything else as it is, so typed decoding
//! only ever sees one shape.
//!
//! Normalization never fails. A node that does not look like what the caller
//! expects is passed through untouched and rejected later by the typed
//! conversion. Only the top-level query entry points collapse an unusable
//! result into an empty list or map (see [`keyed_entries`]).

use serde_json::{Map as JsonMap, Number, Value};
use std::collections::BTreeMap;

/// A raw value returned by the ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<RawValue>),
    /// Insertion-ordered associative structure with scalar keys of any type.
    Map(Vec<(RawValue, RawValue)>),
    /// Plain keyed structure.
    Object(BTreeMap<String, RawValue>),
}

impl RawValue {
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Unsigned integer view of a number or a decimal string.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            RawValue::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            }),
            RawValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Loose truthiness: `null`, `false`, zero and the empty string are false,
    /// every container is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            RawValue::Null => false,
            RawValue::Bool(b) => *b,
            RawValue::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
            RawValue::String(s) => !s.is_empty(),
            RawValue::List(_) | RawValue::Map(_) | RawValue::Object(_) => true,
        }
    }

    /// Convert into a plain JSON tree, folding maps the same way [`normalize`] does.
    pub fn to_json(&self) -> Value {
        match self {
            RawValue::Null => Value::Null,
            RawValue::Bool(b) => Value::Bool(*b),
            RawValue::Number(n) => Value::Number(n.clone()),
            RawValue::String(s) => Value::String(s.clone()),
            RawValue::List(items) => Value::Array(items.iter().map(RawValue::to_json).collect()),
            RawValue::Map(entries) => {
                let mut fields = JsonMap::new();
                for (key, value) in entries {
                    fields.insert(key_string(key), value.to_json());
                }
                Value::Object(fields)
            }
            RawValue::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<JsonMap<String, Value>>(),
            ),
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawValue::Null,
            Value::Bool(b) => RawValue::Bool(b),
            Value::Number(n) => RawValue::Number(n),
            Value::String(s) => RawValue::String(s),
            Value::Array(items) => RawValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(fields) => {
                RawValue::Object(fields.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::String(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::String(s)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<u64> for RawValue {
    fn from(n: u64) -> Self {
        RawValue::Number(n.into())
    }
}

/// Recursively fold every `Map` node into an `Object`.
///
/// Map keys are rendered as strings (`1` → `"1"`, `true` → `"true"`); when two
/// keys render the same, the later entry wins. Idempotent, and the input is
/// left untouched.
pub fn normalize(raw: &RawValue) -> RawValue {
    match raw {
        RawValue::Map(entries) => {
            let mut fields = BTreeMap::new();
            for (key, value) in entries {
                fields.insert(key_string(key), normalize(value));
            }
            RawValue::Object(fields)
        }
        RawValue::Object(fields) => RawValue::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), normalize(v)))
                .collect(),
        ),
        RawValue::List(items) => RawValue::List(items.iter().map(normalize).collect()),
        scalar => scalar.clone(),
    }
}

fn key_string(key: &RawValue) -> String {
    match key {
        RawValue::String(s) => s.clone(),
        RawValue::Number(n) => n.to_string(),
        RawValue::Bool(b) => b.to_string(),
        RawValue::Null => "null".to_string(),
        other => other.to_json().to_string(),
    }
}

/// Top-level entry point for keyed results (`id → record`, `username → record`).
///
/// Returns the normalized entries. A list is keyed by position (`"0"`, `"1"`,
/// ...). Anything else yields an empty list.
pub fn keyed_entries(raw: &RawValue) -> Vec<(String, Value)> {
    match raw.to_json() {
        Value::Object(fields) => fields.into_iter().collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect(),
        _ => Vec::new(),
    }
}

/// Merge the key a record was stored under into the record itself.
///
/// Fields the record already carries take precedence. Non-object records are
/// returned unchanged for the caller to reject.
pub fn merge_key(record: Value, field: &str, key: &str) -> Value {
    match record {
        Value::Object(mut fields) => {
            fields
                .entry(field.to_string())
                .or_insert_with(|| Value::String(key.to_string()));
            Value::Object(fields)
        }
        other => other,
    }
}
