//! Confirmation polling for submitted transactions.

use super::retry::ConfirmationPolicy;
use super::{LedgerTransport, TxHash};
use crate::domain::transaction::{TransactionOutcome, TxStatus};
use thiserror::Error;

/// A transaction was not observed as accepted within the policy's budget.
///
/// Rejection and "still pending" are not told apart.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Transaction {hash} not accepted after {attempts} attempts (last status: {})", .last_status.as_str())]
pub struct ConfirmationError {
    pub hash: TxHash,
    pub attempts: u32,
    pub last_status: TxStatus,
}

/// Poll `hash` until the ledger reports it accepted or the budget runs out.
///
/// Every attempt issues exactly one status request. A transport failure during
/// a poll consumes the attempt and polling continues. No request is made after
/// the last attempt, and the caller cannot cancel the loop early.
pub async fn wait_for_acceptance<T: LedgerTransport + ?Sized>(
    transport: &T,
    hash: &TxHash,
    policy: &ConfirmationPolicy,
) -> Result<TransactionOutcome, ConfirmationError> {
    let mut last_status = TxStatus::Pending;

    for attempt in 1..=policy.max_attempts {
        match transport.transaction(hash).await {
            Ok(raw) => {
                let outcome = TransactionOutcome::from_receipt(hash, &raw);
                if outcome.status.is_accepted() {
                    tracing::debug!(hash = %hash, attempt, "Transaction accepted");
                    return Ok(outcome);
                }
                last_status = outcome.status;
            }
            Err(e) => {
                tracing::debug!(hash = %hash, attempt, "Status poll failed: {}", e);
            }
        }

        if attempt < policy.max_attempts {
            tracing::debug!(
                hash = %hash,
                attempt,
                max = policy.max_attempts,
                status = last_status.as_str(),
                "Transaction not accepted yet"
            );
            if !policy.interval.is_zero() {
                futures_timer::Delay::new(policy.interval).await;
            }
        }
    }

    Err(ConfirmationError {
        hash: hash.clone(),
        attempts: policy.max_attempts,
        last_status,
    })
}
