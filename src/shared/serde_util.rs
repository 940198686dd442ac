//! Custom serde helpers for contract wire formats.

/// Deserializes an unsigned integer that may arrive as a JSON number or as a
/// decimal string.
///
/// Contract integer types (`u32`, `u256`) are rendered as strings by some
/// transports once they exceed the JS safe-integer range.
pub mod lenient_u64 {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrString {
        Num(u64),
        Float(f64),
        Str(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match NumOrString::deserialize(deserializer)? {
            NumOrString::Num(n) => Ok(n),
            NumOrString::Float(f) if f >= 0.0 && f.fract() == 0.0 => Ok(f as u64),
            NumOrString::Float(f) => Err(serde::de::Error::custom(format!(
                "Invalid unsigned integer: {}",
                f
            ))),
            NumOrString::Str(s) => s.trim().parse::<u64>().map_err(|_| {
                serde::de::Error::custom(format!("Invalid unsigned integer: {:?}", s))
            }),
        }
    }
}
