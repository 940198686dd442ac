//! Wire types for participant records (contract reads, after normalization).

use serde::{Deserialize, Serialize};

/// A participant record as returned by `get_participants`.
///
/// `username` is merged in from the key the record was stored under when the
/// record itself does not carry it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParticipantResponse {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub entry_timestamp: String,
    #[serde(default)]
    pub is_winner: bool,
}
