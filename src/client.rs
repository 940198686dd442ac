//! High-level client: `RaffleClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, the bound contract and account, and the
//! read/write plumbing the sub-clients share.

use crate::config::ClientConfig;
use crate::domain::participant::client::Participants;
use crate::domain::raffle::client::Raffles;
use crate::domain::transaction::TransactionOutcome;
use crate::error::{SdkError, TransportError, WriteOperation};
use crate::ledger::{self, CallArg, ConfirmationPolicy, LedgerTransport, RetryPolicy};
use crate::normalize::{self, RawValue};
use crate::session::Session;
use crate::shared::Address;

use async_lock::RwLock;
use std::sync::Arc;

// Re-export sub-client types for convenience.
pub use crate::domain::participant::client::Participants as ParticipantsClient;
pub use crate::domain::raffle::client::Raffles as RafflesClient;
pub use crate::session::Session as SessionHandle;

/// The primary entry point for talking to a raffle contract.
///
/// Provides nested sub-client accessors: `client.raffles()`,
/// `client.participants()`, `client.session()`. Cloning is cheap and clones
/// share the bound account.
pub struct RaffleClient<T> {
    pub(crate) transport: Arc<T>,
    pub(crate) contract: Option<Address>,
    pub(crate) account: Arc<RwLock<Option<Address>>>,
    pub(crate) confirmation: ConfirmationPolicy,
}

#[cfg(feature = "http")]
impl RaffleClient<ledger::LedgerHttp> {
    pub fn builder() -> RaffleClientBuilder {
        RaffleClientBuilder::default()
    }
}

impl<T> RaffleClient<T> {
    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn raffles(&self) -> Raffles<'_, T> {
        Raffles { client: self }
    }

    pub fn participants(&self) -> Participants<'_, T> {
        Participants { client: self }
    }

    pub fn session(&self) -> Session<'_, T> {
        Session { client: self }
    }

    /// Whether a contract address is bound.
    pub fn is_configured(&self) -> bool {
        self.contract.is_some()
    }

    pub fn contract_address(&self) -> Option<&Address> {
        self.contract.as_ref()
    }

    pub fn confirmation_policy(&self) -> &ConfirmationPolicy {
        &self.confirmation
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Check the write preconditions without submitting anything. Returns the
    /// contract and the bound account.
    pub async fn ensure_writable(
        &self,
        op: WriteOperation,
    ) -> Result<(Address, Address), SdkError> {
        let contract = self.contract.clone().ok_or(SdkError::NotConfigured)?;
        let account = self
            .account
            .read()
            .await
            .clone()
            .ok_or(SdkError::WalletNotConnected(op))?;
        Ok((contract, account))
    }
}

impl<T: LedgerTransport> RaffleClient<T> {
    /// Read-only contract call, normalized. `None` when unconfigured.
    pub(crate) async fn read(
        &self,
        method: &str,
        args: &[CallArg],
    ) -> Option<Result<RawValue, TransportError>> {
        let contract = self.contract.as_ref()?;
        let account = self.account.read().await.clone();
        let result = self
            .transport
            .call(contract, account.as_ref(), method, args)
            .await
            .map(|raw| normalize::normalize(&raw));
        Some(result)
    }

    /// Submit a write and wait for acceptance.
    ///
    /// Precondition failures surface as-is. Everything after submission
    /// collapses into [`SdkError::WriteFailed`]; the cause is logged.
    pub(crate) async fn write(
        &self,
        op: WriteOperation,
        args: Vec<CallArg>,
    ) -> Result<TransactionOutcome, SdkError> {
        let (contract, account) = self.ensure_writable(op).await?;

        let hash = match self.transport.send(&contract, &account, op.method(), &args).await {
            Ok(hash) => hash,
            Err(e) => {
                tracing::error!(operation = op.method(), "Error submitting transaction: {}", e);
                return Err(SdkError::WriteFailed(op));
            }
        };
        tracing::debug!(operation = op.method(), hash = %hash, "Transaction submitted");

        match ledger::wait_for_acceptance(self.transport.as_ref(), &hash, &self.confirmation).await
        {
            Ok(outcome) => {
                tracing::info!(
                    operation = op.method(),
                    hash = %outcome.hash,
                    block = ?outcome.block_number,
                    "Transaction accepted"
                );
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!(operation = op.method(), "Error confirming transaction: {}", e);
                Err(SdkError::WriteFailed(op))
            }
        }
    }
}

impl<T> Clone for RaffleClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            contract: self.contract.clone(),
            account: self.account.clone(),
            confirmation: self.confirmation,
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct RaffleClientBuilder {
    config: ClientConfig,
}

impl RaffleClientBuilder {
    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Start from `RAFFLE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_config(ClientConfig::from_env())
    }

    pub fn rpc_url(mut self, url: &str) -> Self {
        self.config.rpc_url = url.to_string();
        self
    }

    pub fn contract_address(mut self, address: &str) -> Self {
        self.config.contract_address = Some(address.to_string());
        self
    }

    pub fn account(mut self, address: &str) -> Self {
        self.config.account = Some(address.to_string());
        self
    }

    pub fn confirmation(mut self, policy: ConfirmationPolicy) -> Self {
        self.config.confirmation = policy;
        self
    }

    pub fn read_retry(mut self, policy: RetryPolicy) -> Self {
        self.config.read_retry = policy;
        self
    }

    /// Build against the JSON-RPC endpoint in `rpc_url`.
    #[cfg(feature = "http")]
    pub fn build(self) -> Result<RaffleClient<ledger::LedgerHttp>, SdkError> {
        let http = ledger::LedgerHttp::new(&self.config.rpc_url)
            .with_read_retry(self.config.read_retry.clone());
        self.build_with_transport(http)
    }

    /// Build against any transport. The RPC settings are ignored.
    pub fn build_with_transport<T: LedgerTransport>(
        self,
        transport: T,
    ) -> Result<RaffleClient<T>, SdkError> {
        let contract = parse_address(self.config.contract_address.as_deref(), "contract")?;
        let account = parse_address(self.config.account.as_deref(), "account")?;

        if contract.is_none() {
            tracing::warn!("No contract address configured; reads return empty data and writes are refused");
        }

        Ok(RaffleClient {
            transport: Arc::new(transport),
            contract,
            account: Arc::new(RwLock::new(account)),
            confirmation: self.config.confirmation,
        })
    }
}

fn parse_address(value: Option<&str>, what: &str) -> Result<Option<Address>, SdkError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => Address::parse(v)
            .map(Some)
            .map_err(|e| SdkError::Validation(format!("Invalid {what} address: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TxHash;

    struct Unreachable;

    impl LedgerTransport for Unreachable {
        async fn call(
            &self,
            _contract: &Address,
            _from: Option<&Address>,
            _method: &str,
            _args: &[CallArg],
        ) -> Result<RawValue, TransportError> {
            Err(TransportError::Timeout)
        }

        async fn send(
            &self,
            _contract: &Address,
            _from: &Address,
            _method: &str,
            _args: &[CallArg],
        ) -> Result<TxHash, TransportError> {
            Err(TransportError::Timeout)
        }

        async fn transaction(&self, _hash: &TxHash) -> Result<RawValue, TransportError> {
            Err(TransportError::Timeout)
        }
    }

    const CONTRACT: &str = "0x00000000000000000000000000000000000000cc";
    const ACCOUNT: &str = "0x00000000000000000000000000000000000000aa";

    #[test]
    fn test_unconfigured_client() {
        let client = RaffleClientBuilder::default()
            .build_with_transport(Unreachable)
            .unwrap();
        assert!(!client.is_configured());
        let err = tokio_test::block_on(client.ensure_writable(WriteOperation::CreateRaffle))
            .unwrap_err();
        assert!(matches!(err, SdkError::NotConfigured));
    }

    #[test]
    fn test_wallet_required_for_writes() {
        let client = RaffleClientBuilder::default()
            .contract_address(CONTRACT)
            .build_with_transport(Unreachable)
            .unwrap();
        let err = tokio_test::block_on(client.ensure_writable(WriteOperation::EnterRaffle))
            .unwrap_err();
        assert!(matches!(
            err,
            SdkError::WalletNotConnected(WriteOperation::EnterRaffle)
        ));
    }

    #[test]
    fn test_invalid_contract_address_rejected() {
        let result = RaffleClientBuilder::default()
            .contract_address("not-an-address")
            .build_with_transport(Unreachable);
        assert!(matches!(result, Err(SdkError::Validation(_))));
    }

    #[test]
    fn test_clones_share_account() {
        let client = RaffleClientBuilder::default()
            .contract_address(CONTRACT)
            .build_with_transport(Unreachable)
            .unwrap();
        let other = client.clone();
        tokio_test::block_on(client.session().bind(Some(Address::from(ACCOUNT))));
        assert!(tokio_test::block_on(other.session().is_connected()));
    }

    #[test]
    fn test_send_failure_is_write_failed() {
        let client = RaffleClientBuilder::default()
            .contract_address(CONTRACT)
            .account(ACCOUNT)
            .confirmation(ConfirmationPolicy::immediate(1))
            .build_with_transport(Unreachable)
            .unwrap();
        let err = tokio_test::block_on(
            client.write(WriteOperation::SelectWinners, vec![CallArg::from("0")]),
        )
        .unwrap_err();
        assert!(matches!(err, SdkError::WriteFailed(WriteOperation::SelectWinners)));
        assert_eq!(err.to_string(), "Failed to select winners");
    }
}
