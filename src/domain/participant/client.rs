//! Participants sub-client: list, count, username check, enter.

use crate::client::RaffleClient;
use crate::domain::participant::{EnterRaffleParams, Participant};
use crate::domain::transaction::TransactionOutcome;
use crate::error::{SdkError, WriteOperation};
use crate::ledger::{CallArg, LedgerTransport};
use crate::normalize;
use crate::shared::RaffleId;
use chrono::{SecondsFormat, Utc};
use std::collections::BTreeMap;

/// Sub-client for participant operations.
pub struct Participants<'a, T> {
    pub(crate) client: &'a RaffleClient<T>,
}

impl<'a, T: LedgerTransport> Participants<'a, T> {
    /// Participants of a raffle, keyed by username. Entries that fail
    /// validation are skipped. A list-shaped result is keyed by each
    /// record's own username.
    pub async fn list(&self, id: &RaffleId) -> Result<BTreeMap<String, Participant>, SdkError> {
        let raw = match self
            .client
            .read("get_participants", &[CallArg::from(id)])
            .await
        {
            None => return Ok(BTreeMap::new()),
            Some(result) => result.map_err(|source| SdkError::ReadFailed {
                query: "participants",
                source,
            })?,
        };

        let mut participants = BTreeMap::new();
        for (username, record) in normalize::keyed_entries(&raw) {
            let record = normalize::merge_key(record, "username", &username);
            match Participant::try_from(record) {
                Ok(p) => {
                    participants.insert(p.username.clone(), p);
                }
                Err(e) => {
                    tracing::warn!(raffle_id = %id, username = %username, "Skipping invalid participant: {}", e)
                }
            }
        }
        Ok(participants)
    }

    /// Number of participants. Fails open: any error reads as 0.
    pub async fn count(&self, id: &RaffleId) -> u64 {
        match self
            .client
            .read("get_participant_count", &[CallArg::from(id)])
            .await
        {
            None => 0,
            Some(Ok(raw)) => raw.as_u64().unwrap_or(0),
            Some(Err(e)) => {
                tracing::warn!(raffle_id = %id, "Error getting participant count: {}", e);
                0
            }
        }
    }

    /// Whether `username` is registered anywhere on the contract. Fails open:
    /// any error reads as "not taken".
    pub async fn is_username_taken(&self, username: &str) -> bool {
        match self
            .client
            .read("is_username_taken", &[CallArg::from(username)])
            .await
        {
            None => false,
            Some(Ok(raw)) => raw.is_truthy(),
            Some(Err(e)) => {
                tracing::warn!(username = %username, "Error checking username: {}", e);
                false
            }
        }
    }

    /// Enter a raffle and wait for acceptance. The entry time is stamped from
    /// the local clock.
    pub async fn enter(&self, params: &EnterRaffleParams) -> Result<TransactionOutcome, SdkError> {
        let entry_timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let args = vec![
            CallArg::from(&params.raffle_id),
            CallArg::from(params.username.as_str()),
            CallArg::from(params.reason.as_str()),
            CallArg::from(entry_timestamp),
        ];
        self.client.write(WriteOperation::EnterRaffle, args).await
    }
}
