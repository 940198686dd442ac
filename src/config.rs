//! Client and query configuration.
//!
//! Nothing here is fatal when missing: an absent contract address yields an
//! unconfigured client whose reads return empty data and whose writes refuse.

use crate::ledger::{ConfirmationPolicy, RetryPolicy};
use crate::network::{DEFAULT_RPC_URL, ENV_ACCOUNT, ENV_CONTRACT_ADDRESS, ENV_RPC_URL};
use crate::query::QueryKind;
use std::time::Duration;

/// Connection settings for a [`RaffleClient`](crate::client::RaffleClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub rpc_url: String,
    /// Deployed raffle contract. `None` leaves the client unconfigured.
    pub contract_address: Option<String>,
    /// Account bound at construction. Can be rebound later through the session.
    pub account: Option<String>,
    pub confirmation: ConfirmationPolicy,
    pub read_retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            contract_address: None,
            account: None,
            confirmation: ConfirmationPolicy::default(),
            read_retry: RetryPolicy::Idempotent,
        }
    }
}

impl ClientConfig {
    /// Read `RAFFLE_RPC_URL`, `RAFFLE_CONTRACT_ADDRESS` and `RAFFLE_ACCOUNT`.
    /// Blank values count as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();
        Self {
            rpc_url: get(ENV_RPC_URL).unwrap_or(defaults.rpc_url),
            contract_address: get(ENV_CONTRACT_ADDRESS),
            account: get(ENV_ACCOUNT),
            ..defaults
        }
    }
}

/// Freshness settings for [`RaffleQueries`](crate::query::RaffleQueries).
#[derive(Debug, Clone, PartialEq)]
pub struct QueryConfig {
    pub stale_time: Duration,
    /// Username checks go stale faster; they guard a write.
    pub username_stale_time: Duration,
    pub refetch_on_focus: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(2),
            username_stale_time: Duration::from_secs(1),
            refetch_on_focus: true,
        }
    }
}

impl QueryConfig {
    pub fn stale_time_for(&self, kind: QueryKind) -> Duration {
        match kind {
            QueryKind::UsernameTaken => self.username_stale_time,
            _ => self.stale_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment_is_unconfigured() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert!(config.contract_address.is_none());
        assert!(config.account.is_none());
        assert_eq!(config.confirmation.max_attempts, 24);
    }

    #[test]
    fn test_blank_contract_address_is_unset() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_CONTRACT_ADDRESS, "   "),
            (ENV_RPC_URL, "http://localhost:4000/api"),
        ]));
        assert!(config.contract_address.is_none());
        assert_eq!(config.rpc_url, "http://localhost:4000/api");
    }

    #[test]
    fn test_username_checks_stale_sooner() {
        let config = QueryConfig::default();
        assert_eq!(
            config.stale_time_for(QueryKind::UsernameTaken),
            Duration::from_secs(1)
        );
        assert_eq!(config.stale_time_for(QueryKind::Raffles), Duration::from_secs(2));
    }
}
