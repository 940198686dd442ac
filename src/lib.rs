//! # Raffle SDK
//!
//! A Rust client for the AI-judged raffle contract: typed reads, confirmed
//! writes and a query cache that stays consistent with the ledger.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core**: Shared newtypes, response normalization, domain models and
//!    lifecycle rules (no I/O)
//! 2. **Ledger**: The `LedgerTransport` seam, confirmation polling and the
//!    `LedgerHttp` JSON-RPC transport with retry policies
//! 3. **Contract Client**: `RaffleClient` with nested sub-clients and the
//!    session binding
//! 4. **Queries**: `RaffleQueries`: cached reads, busy state and
//!    invalidation after confirmed writes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use raffle_sdk::prelude::*;
//!
//! let client = RaffleClient::builder()
//!     .contract_address("0x…")
//!     .account("0x…")
//!     .build()?;
//!
//! let queries = RaffleQueries::new(client, QueryConfig::default());
//! let mut raffles = queries.raffles().await?;
//! sort_for_display(&mut raffles);
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Raw contract values and their normalization into plain records.
pub mod normalize;

/// Domain modules (vertical slices): types, wire types, conversions, sub-clients.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network constants and environment variable names.
pub mod network;

/// Client and query configuration.
pub mod config;

// ── Layer 2: Ledger ──────────────────────────────────────────────────────────

/// Transport seam, confirmation polling, JSON-RPC transport.
pub mod ledger;

// ── Layer 3: Contract Client ─────────────────────────────────────────────────

/// `RaffleClient`: the primary entry point.
pub mod client;

/// Session binding for the acting account.
pub mod session;

// ── Layer 4: Queries ─────────────────────────────────────────────────────────

/// Cached reads and write coordination.
pub mod query;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{Address, RaffleId};

    // Domain types: raffle
    pub use crate::domain::raffle::lifecycle::{
        can_enter, can_select_winners, display_state, is_ended, parse_timestamp,
    };
    pub use crate::domain::raffle::{sort_for_display, CreateRaffleParams, DisplayState, Raffle};

    // Domain types: participant
    pub use crate::domain::participant::{EnterRaffleParams, Participant, HIDDEN_REASON};

    // Domain types: transaction
    pub use crate::domain::transaction::{TransactionOutcome, TxStatus};

    // Errors
    pub use crate::error::{SdkError, TransportError, WriteOperation};

    // Configuration + network
    pub use crate::config::{ClientConfig, QueryConfig};
    pub use crate::network::DEFAULT_RPC_URL;

    // Ledger
    #[cfg(feature = "http")]
    pub use crate::ledger::LedgerHttp;
    pub use crate::ledger::{
        CallArg, ConfirmationPolicy, LedgerTransport, RetryConfig, RetryPolicy, TxHash,
    };
    pub use crate::normalize::RawValue;

    // Client + sub-clients
    pub use crate::client::{
        ParticipantsClient, RaffleClient, RaffleClientBuilder, RafflesClient, SessionHandle,
    };

    // Queries
    pub use crate::query::{MutationState, QueryKey, QueryKind, RaffleDetail, RaffleQueries};
}
