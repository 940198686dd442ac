//! Conversion: raw receipt → TransactionOutcome.

use super::wire::TransactionResponse;
use super::{TransactionOutcome, TxStatus};
use crate::ledger::TxHash;
use crate::normalize::RawValue;
use serde_json::Value;

impl TransactionOutcome {
    /// Interpret a polled receipt. Anything unreadable counts as `Pending`,
    /// so the poll loop simply tries again.
    pub(crate) fn from_receipt(hash: &TxHash, raw: &RawValue) -> Self {
        let response = match raw.to_json() {
            value @ Value::Object(_) => {
                serde_json::from_value::<TransactionResponse>(value).unwrap_or_else(|e| {
                    tracing::debug!(hash = %hash, "Unreadable receipt: {}", e);
                    TransactionResponse::default()
                })
            }
            Value::String(status) => TransactionResponse {
                status_name: Some(status),
                ..TransactionResponse::default()
            },
            _ => TransactionResponse::default(),
        };
        (hash.clone(), response).into()
    }
}

impl From<(TxHash, TransactionResponse)> for TransactionOutcome {
    fn from((hash, source): (TxHash, TransactionResponse)) -> Self {
        let status = source
            .status_name
            .as_deref()
            .or_else(|| source.status.as_ref().and_then(Value::as_str))
            .map(TxStatus::from_name)
            .unwrap_or(TxStatus::Pending);

        TransactionOutcome {
            status,
            hash: source.hash.map(TxHash::new).unwrap_or(hash),
            block_number: source.block_number.as_ref().and_then(block_number),
        }
    }
}

fn block_number(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => match s.strip_prefix("0x") {
            Some(hex) => u64::from_str_radix(hex, 16).ok(),
            None => s.parse().ok(),
        },
        _ => None,
    }
}
