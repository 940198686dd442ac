//! Raffle domain: raffle records, validation, conversion, lifecycle.

pub mod client;
mod convert;
pub mod lifecycle;
pub mod wire;

use crate::shared::{Address, RaffleId};
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;

pub use lifecycle::DisplayState;

/// Maximum length of a raffle's theme/reason, in characters.
pub const MAX_REASON_LEN: usize = 500;

/// Maximum length of a prize description, in characters.
pub const MAX_PRIZE_LEN: usize = 200;

// ─── Raffle ──────────────────────────────────────────────────────────────────

/// A validated raffle record as stored on the ledger.
///
/// Timestamps are kept exactly as stored: they are stamped by whichever client
/// created the record and are not guaranteed to parse. Use
/// [`lifecycle::parse_timestamp`] to interpret them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Raffle {
    pub id: RaffleId,
    pub creator: Address,
    pub reason: String,
    pub prize: String,
    pub num_winners: u32,
    pub created_at: String,
    pub end_date: String,
    pub is_resolved: bool,
    /// Winning usernames in selection order. Empty until resolved.
    pub winners: Vec<String>,
}

impl Raffle {
    pub fn display_state(&self) -> DisplayState {
        lifecycle::display_state(self)
    }

    pub fn is_ended(&self) -> bool {
        lifecycle::is_ended(self)
    }
}

/// Order raffles for listing: unresolved first, then newest first.
/// Raffles whose creation time does not parse go last within their group.
pub fn sort_for_display(raffles: &mut [Raffle]) {
    raffles.sort_by_key(|r| {
        (
            r.is_resolved,
            Reverse(lifecycle::parse_timestamp(&r.created_at)),
        )
    });
}

// ─── CreateRaffleParams ──────────────────────────────────────────────────────

/// Parameters for `create_raffle`. The creation timestamp is stamped by the
/// client at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRaffleParams {
    pub reason: String,
    pub prize: String,
    pub num_winners: u32,
    /// ISO 8601 date or date-time.
    pub end_date: String,
}

impl CreateRaffleParams {
    pub fn new(reason: &str, prize: &str, num_winners: u32, end_date: &str) -> Self {
        Self {
            reason: reason.to_string(),
            prize: prize.to_string(),
            num_winners,
            end_date: end_date.to_string(),
        }
    }

    /// Check the parameters against the ledger's limits. The end date must
    /// fall after the start of the current UTC day.
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        let reason_len = self.reason.chars().count();
        if self.reason.trim().is_empty() {
            errors.push(ValidationError::ReasonEmpty);
        } else if reason_len > MAX_REASON_LEN {
            errors.push(ValidationError::ReasonTooLong(reason_len));
        }

        let prize_len = self.prize.chars().count();
        if self.prize.trim().is_empty() {
            errors.push(ValidationError::PrizeEmpty);
        } else if prize_len > MAX_PRIZE_LEN {
            errors.push(ValidationError::PrizeTooLong(prize_len));
        }

        if self.num_winners < 1 {
            errors.push(ValidationError::NoWinners);
        }

        if self.end_date.trim().is_empty() {
            errors.push(ValidationError::EndDateMissing);
        } else {
            match lifecycle::parse_timestamp(&self.end_date) {
                None => errors.push(ValidationError::EndDateInvalid(self.end_date.clone())),
                Some(end) => {
                    let today = now.date_naive().and_time(NaiveTime::MIN).and_utc();
                    if end <= today {
                        errors.push(ValidationError::EndDateNotInFuture);
                    }
                }
            }
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Multiple("create_raffle".to_string(), errors)),
        }
    }
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ValidationError {
    Multiple(String, Vec<ValidationError>),
    Malformed(String),
    MissingId,
    MissingCreator,
    InvalidWinnerCount(u64),
    WinnersBeforeResolution,
    TooManyWinners { winners: usize, num_winners: u32 },
    ReasonEmpty,
    ReasonTooLong(usize),
    PrizeEmpty,
    PrizeTooLong(usize),
    NoWinners,
    EndDateMissing,
    EndDateInvalid(String),
    EndDateNotInFuture,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Multiple(id, errors) => {
                writeln!(f, "Raffle validation errors ({id}):")?;
                for err in errors {
                    writeln!(f, "  - {}", err)?;
                }
                Ok(())
            }
            ValidationError::Malformed(e) => write!(f, "Malformed raffle: {}", e),
            ValidationError::MissingId => write!(f, "Missing id"),
            ValidationError::MissingCreator => write!(f, "Missing creator"),
            ValidationError::InvalidWinnerCount(n) => write!(f, "Invalid winner count: {}", n),
            ValidationError::WinnersBeforeResolution => {
                write!(f, "Winners present on an unresolved raffle")
            }
            ValidationError::TooManyWinners {
                winners,
                num_winners,
            } => write!(f, "{} winners for a raffle of {}", winners, num_winners),
            ValidationError::ReasonEmpty => write!(f, "Raffle reason/theme is required"),
            ValidationError::ReasonTooLong(len) => write!(
                f,
                "Reason must be at most {} characters (got {})",
                MAX_REASON_LEN, len
            ),
            ValidationError::PrizeEmpty => write!(f, "Prize is required"),
            ValidationError::PrizeTooLong(len) => write!(
                f,
                "Prize must be at most {} characters (got {})",
                MAX_PRIZE_LEN, len
            ),
            ValidationError::NoWinners => write!(f, "Must have at least 1 winner"),
            ValidationError::EndDateMissing => write!(f, "End date is required"),
            ValidationError::EndDateInvalid(s) => write!(f, "End date is not a date: {:?}", s),
            ValidationError::EndDateNotInFuture => write!(f, "End date must be in the future"),
        }
    }
}

impl std::error::Error for ValidationError {}
