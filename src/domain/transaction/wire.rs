//! Wire types for transaction receipts.

use serde::{Deserialize, Serialize};

/// Receipt as returned by a status poll, after normalization.
///
/// Nodes differ in how much they report, so every field is optional. `status`
/// may be a numeric code; `statusName` is preferred when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransactionResponse {
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub status: Option<serde_json::Value>,
    #[serde(default, rename = "statusName")]
    pub status_name: Option<String>,
    #[serde(default, rename = "blockNumber", alias = "block_number")]
    pub block_number: Option<serde_json::Value>,
}
