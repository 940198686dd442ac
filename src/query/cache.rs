//! Query cache: last-fetched value per key, with freshness by kind.

use super::key::{Invalidation, QueryKey, QueryKind};
use crate::config::QueryConfig;
use crate::domain::participant::Participant;
use crate::domain::raffle::Raffle;
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

/// A cached read result.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Raffles(Vec<Raffle>),
    Raffle(Option<Raffle>),
    Participants(BTreeMap<String, Participant>),
    Winners(Vec<String>),
    UsernameTaken(bool),
    ParticipantCount(u64),
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: CachedValue,
    pub fetched_at: Instant,
}

/// Typed access to a [`CachedValue`].
pub(crate) trait QueryValue: Clone + Sized {
    fn into_cached(self) -> CachedValue;
    fn from_cached(value: &CachedValue) -> Option<Self>;
}

macro_rules! query_value {
    ($ty:ty, $variant:ident) => {
        impl QueryValue for $ty {
            fn into_cached(self) -> CachedValue {
                CachedValue::$variant(self)
            }

            fn from_cached(value: &CachedValue) -> Option<Self> {
                match value {
                    CachedValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

query_value!(Vec<Raffle>, Raffles);
query_value!(Option<Raffle>, Raffle);
query_value!(BTreeMap<String, Participant>, Participants);
query_value!(Vec<String>, Winners);
query_value!(bool, UsernameTaken);
query_value!(u64, ParticipantCount);

/// Keyed store of read results. Writes to the same key are last-wins; an
/// invalidated key is dropped so the next read refetches.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, CacheEntry>,
    config: QueryConfig,
}

impl QueryCache {
    pub fn new(config: QueryConfig) -> Self {
        Self {
            entries: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn get(&self, key: &QueryKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// The cached value, if it is younger than its kind's stale time.
    pub fn fresh(&self, key: &QueryKey, now: Instant) -> Option<&CachedValue> {
        self.entries
            .get(key)
            .filter(|entry| !self.is_stale(key.kind(), entry, now))
            .map(|entry| &entry.value)
    }

    pub fn insert(&mut self, key: QueryKey, value: CachedValue, now: Instant) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                fetched_at: now,
            },
        );
    }

    /// Drop every entry the invalidation covers. Returns how many went.
    pub fn invalidate(&mut self, invalidation: &Invalidation) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !invalidation.covers(key));
        before - self.entries.len()
    }

    pub fn invalidate_kind(&mut self, kind: QueryKind) -> usize {
        self.invalidate(&Invalidation::Kind(kind))
    }

    /// Keys whose entries have gone stale, for refetch on focus.
    pub fn stale_keys(&self, now: Instant) -> Vec<QueryKey> {
        self.entries
            .iter()
            .filter(|(key, entry)| self.is_stale(key.kind(), entry, now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_stale(&self, kind: QueryKind, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.fetched_at) >= self.config.stale_time_for(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::RaffleId;
    use std::time::Duration;

    #[test]
    fn test_freshness_window_per_kind() {
        let mut cache = QueryCache::new(QueryConfig::default());
        let t0 = Instant::now();
        let count = QueryKey::ParticipantCount(RaffleId::from("1"));
        let taken = QueryKey::UsernameTaken("alice_99".to_string());
        cache.insert(count.clone(), CachedValue::ParticipantCount(2), t0);
        cache.insert(taken.clone(), CachedValue::UsernameTaken(true), t0);

        let later = t0 + Duration::from_millis(1500);
        assert_eq!(cache.fresh(&count, later), Some(&CachedValue::ParticipantCount(2)));
        assert_eq!(cache.fresh(&taken, later), None);
        assert_eq!(cache.stale_keys(later), vec![taken]);
        assert_eq!(cache.fresh(&count, t0 + Duration::from_secs(2)), None);
    }

    #[test]
    fn test_last_write_wins() {
        let mut cache = QueryCache::default();
        let key = QueryKey::Winners(RaffleId::from("1"));
        let t0 = Instant::now();
        cache.insert(key.clone(), CachedValue::Winners(vec![]), t0);
        cache.insert(key.clone(), CachedValue::Winners(vec!["bob".into()]), t0);
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get(&key).map(|e| &e.value),
            Some(&CachedValue::Winners(vec!["bob".into()]))
        );
    }

    #[test]
    fn test_invalidate_by_kind() {
        let mut cache = QueryCache::default();
        let t0 = Instant::now();
        cache.insert(QueryKey::UsernameTaken("a_1".into()), CachedValue::UsernameTaken(false), t0);
        cache.insert(QueryKey::UsernameTaken("b_2".into()), CachedValue::UsernameTaken(true), t0);
        cache.insert(QueryKey::Raffles, CachedValue::Raffles(vec![]), t0);
        assert_eq!(cache.invalidate_kind(QueryKind::UsernameTaken), 2);
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_typed_access() {
        let value = 5u64.into_cached();
        assert_eq!(u64::from_cached(&value), Some(5));
        assert_eq!(bool::from_cached(&value), None);
    }
}
