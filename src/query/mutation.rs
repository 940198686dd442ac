//! Busy-state tracking for the three writes.

use crate::domain::participant::EnterRaffleParams;
use crate::domain::raffle::CreateRaffleParams;
use crate::domain::transaction::TransactionOutcome;
use crate::error::SdkError;
use crate::shared::RaffleId;

/// Idle → Pending(params) → Settled(result).
#[derive(Debug, Clone, PartialEq)]
pub enum MutationState<P> {
    Idle,
    Pending(P),
    /// The error is kept as its message.
    Settled(Result<TransactionOutcome, String>),
}

impl<P> Default for MutationState<P> {
    fn default() -> Self {
        MutationState::Idle
    }
}

impl<P> MutationState<P> {
    pub fn is_idle(&self) -> bool {
        matches!(self, MutationState::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, MutationState::Pending(_))
    }

    pub fn pending(&self) -> Option<&P> {
        match self {
            MutationState::Pending(params) => Some(params),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<&TransactionOutcome> {
        match self {
            MutationState::Settled(Ok(outcome)) => Some(outcome),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            MutationState::Settled(Err(message)) => Some(message),
            _ => None,
        }
    }

    pub(crate) fn begin(&mut self, params: P) {
        *self = MutationState::Pending(params);
    }

    pub(crate) fn settle(&mut self, result: &Result<TransactionOutcome, SdkError>) {
        *self = MutationState::Settled(match result {
            Ok(outcome) => Ok(outcome.clone()),
            Err(e) => Err(e.to_string()),
        });
    }
}

#[derive(Debug, Default)]
pub(crate) struct MutationTracker {
    pub creating: MutationState<CreateRaffleParams>,
    pub entering: MutationState<EnterRaffleParams>,
    pub selecting: MutationState<RaffleId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::TxStatus;
    use crate::error::WriteOperation;
    use crate::ledger::TxHash;

    #[test]
    fn test_transitions() {
        let mut state: MutationState<RaffleId> = MutationState::default();
        assert!(state.is_idle());

        state.begin(RaffleId::from("2"));
        assert_eq!(state.pending().map(RaffleId::as_str), Some("2"));

        state.settle(&Err(SdkError::WriteFailed(WriteOperation::SelectWinners)));
        assert!(!state.is_pending());
        assert_eq!(state.error(), Some("Failed to select winners"));

        state.begin(RaffleId::from("2"));
        state.settle(&Ok(TransactionOutcome {
            status: TxStatus::Accepted,
            hash: TxHash::from("0x01"),
            block_number: None,
        }));
        assert!(state.outcome().is_some());
        assert!(state.error().is_none());
    }
}
