//! Transaction domain: outcome of a state-changing call.

mod convert;
pub mod wire;

use crate::ledger::TxHash;
use serde::{Deserialize, Serialize};

// ─── TxStatus ────────────────────────────────────────────────────────────────

/// Confirmation status of a submitted transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TxStatus {
    /// Accepted (or already finalized) by the ledger.
    Accepted,
    /// Terminally rejected by the ledger.
    Failed,
    /// Not yet decided, or unknown to the node.
    Pending,
}

impl TxStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TxStatus::Accepted => "Accepted",
            TxStatus::Failed => "Failed",
            TxStatus::Pending => "Pending",
        }
    }

    /// Interpret a ledger status name.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "ACCEPTED" | "FINALIZED" => TxStatus::Accepted,
            "CANCELED" | "CANCELLED" | "UNDETERMINED" | "LEADER_TIMEOUT"
            | "VALIDATORS_TIMEOUT" => TxStatus::Failed,
            _ => TxStatus::Pending,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, TxStatus::Accepted)
    }
}

// ─── TransactionOutcome ──────────────────────────────────────────────────────

/// Result of a write round-trip. Only produced once the ledger has accepted
/// the transaction; never persisted by the SDK.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionOutcome {
    pub status: TxStatus,
    pub hash: TxHash,
    pub block_number: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_names() {
        assert_eq!(TxStatus::from_name("ACCEPTED"), TxStatus::Accepted);
        assert_eq!(TxStatus::from_name("finalized"), TxStatus::Accepted);
        assert_eq!(TxStatus::from_name("CANCELED"), TxStatus::Failed);
        assert_eq!(TxStatus::from_name("UNDETERMINED"), TxStatus::Failed);
        assert_eq!(TxStatus::from_name("PROPOSING"), TxStatus::Pending);
        assert_eq!(TxStatus::from_name(""), TxStatus::Pending);
    }
}
