//! Ledger boundary: the remote contract seen as a transport.
//!
//! [`LedgerTransport`] is the only seam between the SDK and the remote ledger.
//! [`http::LedgerHttp`] speaks JSON-RPC; tests substitute an in-memory ledger.
//! Signing is the transport's concern: `send` names the account, the transport
//! (or the node behind it) signs for it.

pub mod confirm;
#[cfg(feature = "http")]
pub mod http;
pub mod retry;

#[cfg(feature = "http")]
pub use http::LedgerHttp;
pub use confirm::{wait_for_acceptance, ConfirmationError};
pub use retry::{ConfirmationPolicy, RetryConfig, RetryPolicy};

use crate::error::TransportError;
use crate::normalize::RawValue;
use crate::shared::{Address, RaffleId};
use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Call arguments ──────────────────────────────────────────────────────────

/// A positional argument to a contract method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CallArg {
    Str(String),
    Int(u64),
}

impl From<&str> for CallArg {
    fn from(s: &str) -> Self {
        CallArg::Str(s.to_string())
    }
}

impl From<String> for CallArg {
    fn from(s: String) -> Self {
        CallArg::Str(s)
    }
}

impl From<&RaffleId> for CallArg {
    fn from(id: &RaffleId) -> Self {
        CallArg::Str(id.as_str().to_string())
    }
}

impl From<u32> for CallArg {
    fn from(n: u32) -> Self {
        CallArg::Int(n as u64)
    }
}

// ─── TxHash ──────────────────────────────────────────────────────────────────

/// Opaque transaction handle returned by a write submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TxHash {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ─── Transport ───────────────────────────────────────────────────────────────

/// Remote contract access.
///
/// Implementations run on a single cooperative executor; futures are not
/// required to be `Send`.
#[allow(async_fn_in_trait)]
pub trait LedgerTransport {
    /// Read-only call. `from` is informational (some ledgers scope views by caller).
    async fn call(
        &self,
        contract: &Address,
        from: Option<&Address>,
        method: &str,
        args: &[CallArg],
    ) -> Result<RawValue, TransportError>;

    /// Submit a state-changing call on behalf of `from`. Returns as soon as the
    /// ledger has a handle for it; acceptance is polled separately.
    async fn send(
        &self,
        contract: &Address,
        from: &Address,
        method: &str,
        args: &[CallArg],
    ) -> Result<TxHash, TransportError>;

    /// Current receipt for a submitted transaction (`Null` if not yet known).
    async fn transaction(&self, hash: &TxHash) -> Result<RawValue, TransportError>;
}
