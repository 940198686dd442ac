//! Session binding: which account the client acts as.
//!
//! The bound account is the sender for writes and the caller identity for
//! reads. Rebinding applies to every later operation on the client and its
//! clones; operations already in flight keep the account they started with.

use crate::client::RaffleClient;
use crate::domain::raffle::Raffle;
use crate::shared::Address;

/// Sub-client for the bound account.
pub struct Session<'a, T> {
    pub(crate) client: &'a RaffleClient<T>,
}

impl<'a, T> Session<'a, T> {
    /// Bind `account`, or clear the binding with `None`.
    pub async fn bind(&self, account: Option<Address>) {
        let mut slot = self.client.account.write().await;
        match &account {
            Some(a) => tracing::info!(account = %a, "Session account bound"),
            None => tracing::info!("Session account cleared"),
        }
        *slot = account;
    }

    pub async fn account(&self) -> Option<Address> {
        self.client.account.read().await.clone()
    }

    pub async fn is_connected(&self) -> bool {
        self.client.account.read().await.is_some()
    }

    /// Whether the bound account created `raffle`. Case-insensitive.
    pub async fn is_creator(&self, raffle: &Raffle) -> bool {
        self.client
            .account
            .read()
            .await
            .as_ref()
            .is_some_and(|a| a.matches(&raffle.creator))
    }
}
