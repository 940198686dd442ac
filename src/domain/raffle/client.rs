//! Raffles sub-client: list, get, winners, create, select winners.

use crate::client::RaffleClient;
use crate::domain::raffle::{CreateRaffleParams, Raffle};
use crate::domain::transaction::TransactionOutcome;
use crate::error::{SdkError, TransportError, WriteOperation};
use crate::ledger::{CallArg, LedgerTransport};
use crate::normalize::{self, RawValue};
use crate::shared::RaffleId;
use chrono::{SecondsFormat, Utc};

/// Sub-client for raffle operations.
pub struct Raffles<'a, T> {
    pub(crate) client: &'a RaffleClient<T>,
}

impl<'a, T: LedgerTransport> Raffles<'a, T> {
    /// All raffles, in ledger order. Entries that fail validation are skipped.
    /// Empty when no contract is configured.
    ///
    /// A list-shaped result is keyed by position; a record's own `id` wins.
    pub async fn list(&self) -> Result<Vec<Raffle>, SdkError> {
        let raw = match self.client.read("get_all_raffles", &[]).await {
            None => return Ok(Vec::new()),
            Some(result) => result.map_err(|source| SdkError::ReadFailed {
                query: "raffles",
                source,
            })?,
        };

        let records = normalize::keyed_entries(&raw);
        let mut raffles = Vec::with_capacity(records.len());
        for (key, record) in records {
            let record = normalize::merge_key(record, "id", &key);
            match Raffle::try_from(record) {
                Ok(raffle) => raffles.push(raffle),
                Err(e) => tracing::warn!(key = %key, "Skipping invalid raffle: {}", e),
            }
        }
        Ok(raffles)
    }

    /// A single raffle. `None` when the ledger reports no such raffle or no
    /// contract is configured.
    pub async fn get(&self, id: &RaffleId) -> Result<Option<Raffle>, SdkError> {
        let raw = match self.client.read("get_raffle", &[CallArg::from(id)]).await {
            None => return Ok(None),
            Some(Err(e)) if is_not_found(&e) => return Ok(None),
            Some(result) => result.map_err(|source| SdkError::ReadFailed {
                query: "raffle",
                source,
            })?,
        };

        if raw.is_null() {
            return Ok(None);
        }

        let record = normalize::merge_key(raw.to_json(), "id", id.as_str());
        let raffle = Raffle::try_from(record).map_err(|e| SdkError::Validation(e.to_string()))?;
        Ok(Some(raffle))
    }

    /// Winning usernames in selection order. Empty until resolved.
    pub async fn winners(&self, id: &RaffleId) -> Result<Vec<String>, SdkError> {
        let raw = match self.client.read("get_winners", &[CallArg::from(id)]).await {
            None => return Ok(Vec::new()),
            Some(result) => result.map_err(|source| SdkError::ReadFailed {
                query: "winners",
                source,
            })?,
        };

        match raw {
            RawValue::List(items) => Ok(items
                .into_iter()
                .filter_map(|item| match item {
                    RawValue::String(name) => Some(name),
                    other => {
                        tracing::warn!(raffle_id = %id, "Skipping non-string winner: {:?}", other);
                        None
                    }
                })
                .collect()),
            _ => Ok(Vec::new()),
        }
    }

    /// Create a raffle and wait for acceptance. The creation time is stamped
    /// from the local clock.
    ///
    /// Parameters are submitted as given; see
    /// [`CreateRaffleParams::validate_at`] for the client-side checks.
    pub async fn create(&self, params: &CreateRaffleParams) -> Result<TransactionOutcome, SdkError> {
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let args = vec![
            CallArg::from(params.reason.as_str()),
            CallArg::from(params.prize.as_str()),
            CallArg::from(params.num_winners),
            CallArg::from(created_at),
            CallArg::from(params.end_date.as_str()),
        ];
        self.client.write(WriteOperation::CreateRaffle, args).await
    }

    /// Trigger winner selection and wait for acceptance.
    pub async fn select_winners(&self, id: &RaffleId) -> Result<TransactionOutcome, SdkError> {
        self.client
            .write(WriteOperation::SelectWinners, vec![CallArg::from(id)])
            .await
    }
}

fn is_not_found(err: &TransportError) -> bool {
    match err {
        TransportError::Rpc { message, .. } => message.to_ascii_lowercase().contains("not found"),
        _ => false,
    }
}
