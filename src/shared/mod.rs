//! Shared newtypes and utilities used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the raw strings the contract returns, so they can be used directly in wire
//! types without conversion overhead.

pub mod serde_util;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ─── RaffleId ────────────────────────────────────────────────────────────────

/// Ledger-assigned raffle identifier (the contract uses a decimal counter, e.g. `"7"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RaffleId(String);

impl RaffleId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RaffleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RaffleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RaffleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for RaffleId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RaffleId(s.to_string()))
    }
}

impl Serialize for RaffleId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RaffleId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(RaffleId(s))
    }
}

// ─── Address ─────────────────────────────────────────────────────────────────

/// A hex account address (`0x` + 40 hex digits) stored as given.
///
/// Comparison with [`Address::matches`] ignores case, since wallets and the
/// contract may disagree on checksum casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

/// Why a string was rejected by [`Address::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    MissingPrefix,
    InvalidLength(usize),
    InvalidHex(String),
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::MissingPrefix => write!(f, "address must start with 0x"),
            AddressError::InvalidLength(len) => {
                write!(f, "address must have 40 hex digits, got {len}")
            }
            AddressError::InvalidHex(e) => write!(f, "address is not valid hex: {e}"),
        }
    }
}

impl std::error::Error for AddressError {}

impl Address {
    /// Unchecked constructor, for values that come from the ledger itself.
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }

    /// Parse and validate a user-supplied address.
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or(AddressError::MissingPrefix)?;
        if digits.len() != 40 {
            return Err(AddressError::InvalidLength(digits.len()));
        }
        hex::decode(digits).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive equality.
    pub fn matches(&self, other: &Address) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Address(s))
    }
}
