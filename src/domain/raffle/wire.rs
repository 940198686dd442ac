//! Wire types for raffle records (contract reads, after normalization).

use crate::shared::serde_util::lenient_u64;
use serde::{Deserialize, Serialize};

/// A raffle record as returned by `get_raffle` / `get_all_raffles`.
///
/// `id` is usually absent from the stored record and merged in from the key it
/// was stored under. `prize` is not persisted by every contract revision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RaffleResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    pub reason: String,
    #[serde(default)]
    pub prize: String,
    #[serde(deserialize_with = "lenient_u64::deserialize")]
    pub num_winners: u64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub is_resolved: bool,
    #[serde(default)]
    pub winners: Vec<String>,
}
