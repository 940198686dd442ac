//! Query/cache coordinator: `RaffleQueries`.
//!
//! Sits between callers and the contract client: serves fresh reads from the
//! cache, refetches stale ones, tracks in-flight writes and invalidates the
//! affected reads once a write is confirmed. Reads while unconfigured bypass
//! the cache and return empty data.

pub mod cache;
pub mod key;
pub mod mutation;

pub use cache::{CacheEntry, CachedValue, QueryCache};
pub use key::{invalidations, Invalidation, QueryKey, QueryKind};
pub use mutation::MutationState;

use crate::client::RaffleClient;
use crate::config::QueryConfig;
use crate::domain::participant::{EnterRaffleParams, Participant};
use crate::domain::raffle::{lifecycle, CreateRaffleParams, Raffle};
use crate::domain::transaction::TransactionOutcome;
use crate::error::{SdkError, WriteOperation};
use crate::ledger::LedgerTransport;
use crate::shared::{Address, RaffleId};
use cache::QueryValue;
use mutation::MutationTracker;

use async_lock::RwLock;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

/// Everything a raffle detail view shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaffleDetail {
    pub raffle: Raffle,
    pub participants: BTreeMap<String, Participant>,
    pub participant_count: u64,
}

/// Cached, invalidation-aware access to one raffle contract.
pub struct RaffleQueries<T> {
    client: RaffleClient<T>,
    cache: Arc<RwLock<QueryCache>>,
    mutations: Arc<RwLock<MutationTracker>>,
}

impl<T> Clone for RaffleQueries<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            cache: self.cache.clone(),
            mutations: self.mutations.clone(),
        }
    }
}

impl<T: LedgerTransport> RaffleQueries<T> {
    pub fn new(client: RaffleClient<T>, config: QueryConfig) -> Self {
        Self {
            client,
            cache: Arc::new(RwLock::new(QueryCache::new(config))),
            mutations: Arc::new(RwLock::new(MutationTracker::default())),
        }
    }

    pub fn client(&self) -> &RaffleClient<T> {
        &self.client
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub async fn raffles(&self) -> Result<Vec<Raffle>, SdkError> {
        self.query(QueryKey::Raffles, move || async move {
            self.client.raffles().list().await
        })
        .await
    }

    /// `None` id means "nothing selected": no fetch, no data.
    pub async fn raffle(&self, id: Option<&RaffleId>) -> Result<Option<Raffle>, SdkError> {
        let Some(id) = id else { return Ok(None) };
        self.query(QueryKey::Raffle(id.clone()), move || async move {
            self.client.raffles().get(id).await
        })
        .await
    }

    pub async fn participants(
        &self,
        id: Option<&RaffleId>,
    ) -> Result<BTreeMap<String, Participant>, SdkError> {
        let Some(id) = id else {
            return Ok(BTreeMap::new());
        };
        self.query(QueryKey::Participants(id.clone()), move || async move {
            self.client.participants().list(id).await
        })
        .await
    }

    pub async fn winners(&self, id: Option<&RaffleId>) -> Result<Vec<String>, SdkError> {
        let Some(id) = id else { return Ok(Vec::new()) };
        self.query(QueryKey::Winners(id.clone()), move || async move {
            self.client.raffles().winners(id).await
        })
        .await
    }

    /// Fails open to 0, like the underlying read.
    pub async fn participant_count(&self, id: Option<&RaffleId>) -> u64 {
        let Some(id) = id else { return 0 };
        self.query(QueryKey::ParticipantCount(id.clone()), move || async move {
            Ok(self.client.participants().count(id).await)
        })
        .await
        .unwrap_or_default()
    }

    /// Fails open to `false`. A blank username is never looked up.
    pub async fn is_username_taken(&self, username: &str) -> bool {
        if username.trim().is_empty() {
            return false;
        }
        self.query(QueryKey::UsernameTaken(username.to_string()), move || async move {
            Ok(self.client.participants().is_username_taken(username).await)
        })
        .await
        .unwrap_or_default()
    }

    /// Raffle plus its participants. `None` when the raffle does not exist.
    pub async fn raffle_detail(&self, id: &RaffleId) -> Result<Option<RaffleDetail>, SdkError> {
        let Some(raffle) = self.raffle(Some(id)).await? else {
            return Ok(None);
        };
        let participants = self.participants(Some(id)).await?;
        let participant_count = participants.len() as u64;
        Ok(Some(RaffleDetail {
            raffle,
            participants,
            participant_count,
        }))
    }

    async fn query<V, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<V, SdkError>
    where
        V: QueryValue,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, SdkError>>,
    {
        if !self.client.is_configured() {
            return fetch().await;
        }

        {
            let cache = self.cache.read().await;
            if let Some(value) = cache.fresh(&key, Instant::now()).and_then(V::from_cached) {
                return Ok(value);
            }
        }

        let value = fetch().await?;
        tracing::debug!(key = %key, "Query refreshed");
        self.cache
            .write()
            .await
            .insert(key, value.clone().into_cached(), Instant::now());
        Ok(value)
    }

    // ── Writes ───────────────────────────────────────────────────────────

    /// Validate, submit, wait for acceptance, then invalidate.
    pub async fn create_raffle(
        &self,
        params: CreateRaffleParams,
    ) -> Result<TransactionOutcome, SdkError> {
        params
            .validate_at(Utc::now())
            .map_err(|e| SdkError::Validation(e.to_string()))?;
        self.client
            .ensure_writable(WriteOperation::CreateRaffle)
            .await?;

        self.mutations.write().await.creating.begin(params.clone());
        let result = self.client.raffles().create(&params).await;
        if result.is_ok() {
            self.apply(WriteOperation::CreateRaffle, None).await;
        }
        self.mutations.write().await.creating.settle(&result);
        result
    }

    /// Enter a raffle. Refused before submission when the entry is malformed,
    /// the raffle is missing, resolved or ended, or the username is taken.
    pub async fn enter_raffle(
        &self,
        params: EnterRaffleParams,
    ) -> Result<TransactionOutcome, SdkError> {
        params
            .validate()
            .map_err(|e| SdkError::Validation(e.to_string()))?;
        self.client
            .ensure_writable(WriteOperation::EnterRaffle)
            .await?;

        let raffle = self.require_raffle(&params.raffle_id).await?;
        if raffle.is_resolved {
            return Err(SdkError::Ineligible(
                "This raffle has already been resolved.".to_string(),
            ));
        }
        if lifecycle::is_ended(&raffle) {
            return Err(SdkError::Ineligible(
                "This raffle has ended. You can no longer enter.".to_string(),
            ));
        }
        if self.is_username_taken(&params.username).await {
            return Err(SdkError::Ineligible(format!(
                "Username '{}' is already taken",
                params.username
            )));
        }

        self.mutations.write().await.entering.begin(params.clone());
        let result = self.client.participants().enter(&params).await;
        if result.is_ok() {
            self.apply(WriteOperation::EnterRaffle, Some(&params.raffle_id))
                .await;
        }
        self.mutations.write().await.entering.settle(&result);
        result
    }

    /// Select winners. Only the creator may, and only while unresolved with at
    /// least one participant.
    pub async fn select_winners(&self, id: &RaffleId) -> Result<TransactionOutcome, SdkError> {
        let (_, account) = self
            .client
            .ensure_writable(WriteOperation::SelectWinners)
            .await?;

        let raffle = self.require_raffle(id).await?;
        if !account.matches(&raffle.creator) {
            return Err(SdkError::Ineligible(
                "Only the raffle creator can select winners".to_string(),
            ));
        }
        if raffle.is_resolved {
            return Err(SdkError::Ineligible(
                "This raffle has already been resolved.".to_string(),
            ));
        }
        let participant_count = self.participants(Some(id)).await?.len() as u64;
        if !lifecycle::can_select_winners(&raffle, Some(&account), participant_count) {
            return Err(SdkError::Ineligible(
                "No participants in this raffle".to_string(),
            ));
        }

        self.mutations.write().await.selecting.begin(id.clone());
        let result = self.client.raffles().select_winners(id).await;
        if result.is_ok() {
            self.apply(WriteOperation::SelectWinners, Some(id)).await;
        }
        self.mutations.write().await.selecting.settle(&result);
        result
    }

    async fn require_raffle(&self, id: &RaffleId) -> Result<Raffle, SdkError> {
        self.raffle(Some(id))
            .await?
            .ok_or_else(|| SdkError::Ineligible(format!("Raffle {id} not found")))
    }

    async fn apply(&self, op: WriteOperation, raffle_id: Option<&RaffleId>) {
        let mut cache = self.cache.write().await;
        let dropped: usize = invalidations(op, raffle_id)
            .iter()
            .map(|inv| cache.invalidate(inv))
            .sum();
        tracing::debug!(operation = op.method(), dropped, "Invalidated queries");
    }

    // ── Busy state ───────────────────────────────────────────────────────

    pub async fn creating(&self) -> MutationState<CreateRaffleParams> {
        self.mutations.read().await.creating.clone()
    }

    pub async fn entering(&self) -> MutationState<EnterRaffleParams> {
        self.mutations.read().await.entering.clone()
    }

    pub async fn selecting(&self) -> MutationState<RaffleId> {
        self.mutations.read().await.selecting.clone()
    }

    pub async fn is_creating(&self) -> bool {
        self.mutations.read().await.creating.is_pending()
    }

    pub async fn is_entering(&self) -> bool {
        self.mutations.read().await.entering.is_pending()
    }

    /// The raffle whose winner selection is in flight, if any.
    pub async fn selecting_raffle_id(&self) -> Option<RaffleId> {
        self.mutations.read().await.selecting.pending().cloned()
    }

    pub async fn is_selecting(&self, id: &RaffleId) -> bool {
        self.selecting_raffle_id().await.as_ref() == Some(id)
    }

    // ── Cache control ────────────────────────────────────────────────────

    /// Refetch every stale entry. Returns how many were refreshed; failures are
    /// logged and leave the old value in place.
    pub async fn on_focus(&self) -> usize {
        let keys = {
            let cache = self.cache.read().await;
            if !cache.config().refetch_on_focus {
                return 0;
            }
            cache.stale_keys(Instant::now())
        };

        let mut refreshed = 0;
        for key in keys {
            match self.refetch(&key).await {
                Ok(()) => refreshed += 1,
                Err(e) => tracing::warn!(key = %key, "Refetch failed: {}", e),
            }
        }
        refreshed
    }

    async fn refetch(&self, key: &QueryKey) -> Result<(), SdkError> {
        let raffles = self.client.raffles();
        let participants = self.client.participants();
        let value = match key {
            QueryKey::Raffles => CachedValue::Raffles(raffles.list().await?),
            QueryKey::Raffle(id) => CachedValue::Raffle(raffles.get(id).await?),
            QueryKey::Participants(id) => CachedValue::Participants(participants.list(id).await?),
            QueryKey::Winners(id) => CachedValue::Winners(raffles.winners(id).await?),
            QueryKey::UsernameTaken(name) => {
                CachedValue::UsernameTaken(participants.is_username_taken(name).await)
            }
            QueryKey::ParticipantCount(id) => {
                CachedValue::ParticipantCount(participants.count(id).await)
            }
        };
        self.cache
            .write()
            .await
            .insert(key.clone(), value, Instant::now());
        Ok(())
    }

    pub async fn invalidate(&self, key: &QueryKey) {
        self.cache
            .write()
            .await
            .invalidate(&Invalidation::Key(key.clone()));
    }

    pub async fn invalidate_kind(&self, kind: QueryKind) {
        self.cache.write().await.invalidate_kind(kind);
    }

    pub async fn clear(&self) {
        self.cache.write().await.clear();
    }

    pub async fn cached(&self, key: &QueryKey) -> Option<CacheEntry> {
        self.cache.read().await.get(key).cloned()
    }

    /// Rebind the acting account. Cached reads stay valid: none of them depend
    /// on who is asking.
    pub async fn rebind_account(&self, account: Option<Address>) {
        self.client.session().bind(account).await;
    }
}
