//! Unified SDK error types.

use std::fmt;
use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    /// No contract address is bound to the client.
    #[error("Contract not configured. Set RAFFLE_CONTRACT_ADDRESS to the deployed raffle contract.")]
    NotConfigured,

    /// A write was attempted without a bound account.
    #[error("Wallet not connected. Connect a wallet to {0}.")]
    WalletNotConnected(WriteOperation),

    /// A primary read could not be fetched. Distinct from "no data".
    #[error("Failed to fetch {query} from contract: {source}")]
    ReadFailed {
        query: &'static str,
        #[source]
        source: TransportError,
    },

    /// A write was rejected, failed in transport, or was never confirmed.
    /// The underlying cause is only logged.
    #[error("Failed to {0}")]
    WriteFailed(WriteOperation),

    #[error("Validation error: {0}")]
    Validation(String),

    /// An advisory client-side check refused the operation before submission.
    #[error("{0}")]
    Ineligible(String),
}

/// The three state-changing contract operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteOperation {
    CreateRaffle,
    EnterRaffle,
    SelectWinners,
}

impl WriteOperation {
    /// Remote method name on the contract.
    pub fn method(&self) -> &'static str {
        match self {
            WriteOperation::CreateRaffle => "create_raffle",
            WriteOperation::EnterRaffle => "enter_raffle",
            WriteOperation::SelectWinners => "select_winners",
        }
    }
}

impl fmt::Display for WriteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOperation::CreateRaffle => write!(f, "create raffle"),
            WriteOperation::EnterRaffle => write!(f, "enter raffle"),
            WriteOperation::SelectWinners => write!(f, "select winners"),
        }
    }
}

/// Ledger transport errors.
#[derive(Error, Debug)]
pub enum TransportError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("Timeout")]
    Timeout,

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },

    #[error("Malformed response: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_failed_names_operation_only() {
        let err = SdkError::WriteFailed(WriteOperation::CreateRaffle);
        assert_eq!(err.to_string(), "Failed to create raffle");
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_read_failed_exposes_source() {
        let err = SdkError::ReadFailed {
            query: "raffles",
            source: TransportError::Timeout,
        };
        assert!(err.to_string().starts_with("Failed to fetch raffles"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_write_operation_methods() {
        assert_eq!(WriteOperation::EnterRaffle.method(), "enter_raffle");
        assert_eq!(WriteOperation::SelectWinners.to_string(), "select winners");
    }
}
