//! JSON-RPC ledger transport: `LedgerHttp`.
//!
//! One method per transport operation. Returns raw values (normalization and
//! conversion to domain types happen in the contract client).
//!
//! Calls and sends carry named-function params (`{to, from, function, args}`)
//! rather than encoded calldata. The endpoint must be a node or proxy that
//! accepts that shape; a stock GenLayer Studio node expects calldata built
//! by genlayer-js and will reject these requests.

use crate::error::TransportError;
use crate::ledger::retry::{RetryConfig, RetryPolicy};
use crate::ledger::{CallArg, LedgerTransport, TxHash};
use crate::network::{RPC_CALL, RPC_GET_TRANSACTION, RPC_SEND_TRANSACTION};
use crate::normalize::RawValue;
use crate::shared::Address;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

/// Low-level JSON-RPC client for the ledger node.
pub struct LedgerHttp {
    rpc_url: String,
    client: Client,
    read_retry: RetryPolicy,
    next_id: Arc<AtomicU64>,
}

#[derive(Serialize)]
struct JsonRpcRequest<'a, P: Serialize> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Deserialize)]
struct JsonRpcResponse<R> {
    result: Option<R>,
    error: Option<JsonRpcErrorObject>,
}

#[derive(Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Serialize)]
struct CallParams<'a> {
    to: &'a Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<&'a Address>,
    function: &'a str,
    args: &'a [CallArg],
}

#[derive(Serialize)]
struct SendParams<'a> {
    from: &'a Address,
    to: &'a Address,
    function: &'a str,
    args: &'a [CallArg],
    value: &'static str,
}

impl LedgerHttp {
    pub fn new(rpc_url: &str) -> Self {
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder
                .timeout(Duration::from_secs(30))
                .pool_max_idle_per_host(10);
        }

        Self {
            rpc_url: rpc_url.trim_end_matches('/').to_string(),
            client: builder.build().expect("Failed to build HTTP client"),
            read_retry: RetryPolicy::Idempotent,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Override the retry policy used for reads and status polls.
    pub fn with_read_retry(mut self, policy: RetryPolicy) -> Self {
        self.read_retry = policy;
        self
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    // ── Internal JSON-RPC methods ────────────────────────────────────────

    async fn rpc<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
        retry: &RetryPolicy,
    ) -> Result<Option<R>, TransportError> {
        let config = match retry {
            RetryPolicy::None => {
                return self.do_request(method, &params).await;
            }
            RetryPolicy::Idempotent => RetryConfig::idempotent(),
            RetryPolicy::Custom(c) => c.clone(),
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_request::<P, R>(method, &params).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    let should_retry = match &e {
                        TransportError::ServerError { status, .. } => {
                            config.retryable_statuses.contains(status)
                        }
                        TransportError::RateLimited => config.retryable_statuses.contains(&429),
                        TransportError::Timeout => true,
                        TransportError::Reqwest(re) => {
                            #[cfg(not(target_arch = "wasm32"))]
                            let retryable = re.is_connect() || re.is_timeout() || re.is_request();
                            #[cfg(target_arch = "wasm32")]
                            let retryable = re.is_timeout() || re.is_request();
                            retryable
                        }
                        _ => false,
                    };

                    if should_retry && attempt < config.max_retries {
                        let delay = config.delay_for_attempt(attempt);
                        tracing::debug!(
                            attempt = attempt + 1,
                            max = config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            "Retrying {} against {}",
                            method,
                            self.rpc_url
                        );
                        futures_timer::Delay::new(delay).await;
                        last_error = Some(e);
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(TransportError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_request<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: &P,
    ) -> Result<Option<R>, TransportError> {
        let body = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let resp = self.client.post(&self.rpc_url).json(&body).send().await?;
        let status = resp.status();

        if status.is_success() {
            let parsed = resp.json::<JsonRpcResponse<R>>().await?;
            if let Some(err) = parsed.error {
                return Err(TransportError::Rpc {
                    code: err.code,
                    message: err.message,
                });
            }
            return Ok(parsed.result);
        }

        let status_code = status.as_u16();
        let body_text = resp.text().await.unwrap_or_default();

        match status_code {
            408 => Err(TransportError::Timeout),
            429 => Err(TransportError::RateLimited),
            _ => Err(TransportError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

impl LedgerTransport for LedgerHttp {
    async fn call(
        &self,
        contract: &Address,
        from: Option<&Address>,
        method: &str,
        args: &[CallArg],
    ) -> Result<RawValue, TransportError> {
        let params = [CallParams {
            to: contract,
            from,
            function: method,
            args,
        }];
        let result: Option<serde_json::Value> =
            self.rpc(RPC_CALL, params, &self.read_retry).await?;
        Ok(result.map(RawValue::from).unwrap_or(RawValue::Null))
    }

    async fn send(
        &self,
        contract: &Address,
        from: &Address,
        method: &str,
        args: &[CallArg],
    ) -> Result<TxHash, TransportError> {
        let params = [SendParams {
            from,
            to: contract,
            function: method,
            args,
            value: "0x0",
        }];
        let hash: Option<String> = self
            .rpc(RPC_SEND_TRANSACTION, params, &RetryPolicy::None)
            .await?;
        hash.map(TxHash::new)
            .ok_or_else(|| TransportError::Decode(format!("{method}: no transaction hash returned")))
    }

    async fn transaction(&self, hash: &TxHash) -> Result<RawValue, TransportError> {
        let result: Option<serde_json::Value> = self
            .rpc(RPC_GET_TRANSACTION, [hash.as_str()], &self.read_retry)
            .await?;
        Ok(result.map(RawValue::from).unwrap_or(RawValue::Null))
    }
}

impl Clone for LedgerHttp {
    fn clone(&self) -> Self {
        Self {
            rpc_url: self.rpc_url.clone(),
            client: self.client.clone(),
            read_retry: self.read_retry.clone(),
            next_id: self.next_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_url_trailing_slash_trimmed() {
        let http = LedgerHttp::new("https://node.example/api/");
        assert_eq!(http.rpc_url(), "https://node.example/api");
    }

    #[test]
    fn test_call_request_shape() {
        let contract = Address::from("0x00000000000000000000000000000000000000aa");
        let args = [CallArg::from("7")];
        let body = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: RPC_CALL,
            params: [CallParams {
                to: &contract,
                from: None,
                function: "get_raffle",
                args: &args,
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["method"], "gen_call");
        assert_eq!(json["params"][0]["function"], "get_raffle");
        assert_eq!(json["params"][0]["args"][0], "7");
        assert!(json["params"][0].get("from").is_none());
    }

    #[test]
    fn test_response_with_error_object() {
        let resp: JsonRpcResponse<serde_json::Value> = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"Raffle not found"}}"#,
        )
        .unwrap();
        assert!(resp.result.is_none());
        assert_eq!(resp.error.unwrap().message, "Raffle not found");
    }
}
