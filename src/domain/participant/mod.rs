//! Participant domain: entries into a raffle, entry validation.

pub mod client;
mod convert;
pub mod wire;

use crate::shared::RaffleId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder the ledger returns instead of an entry reason while the raffle
/// is unresolved.
pub const HIDDEN_REASON: &str = "[Hidden until resolved]";

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 30;
pub const MAX_REASON_LEN: usize = 500;

/// One entry into a raffle, keyed by username within that raffle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub username: String,
    pub reason: String,
    pub entry_timestamp: String,
    pub is_winner: bool,
}

impl Participant {
    /// False while the ledger is withholding the entry reason.
    pub fn reason_visible(&self) -> bool {
        self.reason != HIDDEN_REASON
    }
}

/// Parameters for `enter_raffle`. The entry timestamp is stamped by the client
/// at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnterRaffleParams {
    pub raffle_id: RaffleId,
    pub username: String,
    pub reason: String,
}

impl EnterRaffleParams {
    pub fn new(raffle_id: &RaffleId, username: &str, reason: &str) -> Self {
        Self {
            raffle_id: raffle_id.clone(),
            username: username.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Format checks only. Whether the username is free and the raffle still
    /// open needs the ledger; the query layer checks both before submitting.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        if let Err(e) = validate_username(&self.username) {
            errors.push(e);
        }

        let reason_len = self.reason.chars().count();
        if self.reason.trim().is_empty() {
            errors.push(ValidationError::ReasonEmpty);
        } else if reason_len > MAX_REASON_LEN {
            errors.push(ValidationError::ReasonTooLong(reason_len));
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Multiple(self.username.clone(), errors)),
        }
    }
}

/// 3–30 characters of ASCII letters, digits and underscores.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(ValidationError::UsernameEmpty);
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ValidationError::UsernameInvalidChars);
    }
    let len = username.len();
    if len < MIN_USERNAME_LEN {
        return Err(ValidationError::UsernameTooShort(len));
    }
    if len > MAX_USERNAME_LEN {
        return Err(ValidationError::UsernameTooLong(len));
    }
    Ok(())
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ValidationError {
    Multiple(String, Vec<ValidationError>),
    Malformed(String),
    MissingUsername,
    UsernameEmpty,
    UsernameTooShort(usize),
    UsernameTooLong(usize),
    UsernameInvalidChars,
    ReasonEmpty,
    ReasonTooLong(usize),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Multiple(username, errors) => {
                writeln!(f, "Participant validation errors ({username}):")?;
                for err in errors {
                    writeln!(f, "  - {}", err)?;
                }
                Ok(())
            }
            ValidationError::Malformed(e) => write!(f, "Malformed participant: {}", e),
            ValidationError::MissingUsername => write!(f, "Missing username"),
            ValidationError::UsernameEmpty => write!(f, "Username is required"),
            ValidationError::UsernameTooShort(len) => write!(
                f,
                "Username must be at least {} characters (got {})",
                MIN_USERNAME_LEN, len
            ),
            ValidationError::UsernameTooLong(len) => write!(
                f,
                "Username must be at most {} characters (got {})",
                MAX_USERNAME_LEN, len
            ),
            ValidationError::UsernameInvalidChars => write!(
                f,
                "Username can only contain letters, numbers, and underscores"
            ),
            ValidationError::ReasonEmpty => write!(f, "Reason for entry is required"),
            ValidationError::ReasonTooLong(len) => write!(
                f,
                "Reason must be at most {} characters (got {})",
                MAX_REASON_LEN, len
            ),
        }
    }
}

impl std::error::Error for ValidationError {}
