//! Lifecycle derivation: ended / display state / eligibility.
//!
//! Everything here is a pure function of a raffle record and a point in time.
//! The `*_at` variants take the time explicitly; the others read the wall clock.

use super::Raffle;
use crate::shared::Address;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// How a raffle should be presented. Resolution always wins over end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayState {
    Active,
    Ended,
    Resolved,
}

impl DisplayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayState::Active => "Active",
            DisplayState::Ended => "Ended",
            DisplayState::Resolved => "Resolved",
        }
    }
}

impl fmt::Display for DisplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339, offset-less date-times (read as UTC) and bare dates
/// (midnight UTC). Returns `None` for anything else.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// True once `now` is strictly past the end date. An unparseable end date
/// never ends.
pub fn is_ended_at(raffle: &Raffle, now: DateTime<Utc>) -> bool {
    match parse_timestamp(&raffle.end_date) {
        Some(end) => now > end,
        None => false,
    }
}

pub fn is_ended(raffle: &Raffle) -> bool {
    is_ended_at(raffle, Utc::now())
}

pub fn display_state_at(raffle: &Raffle, now: DateTime<Utc>) -> DisplayState {
    if raffle.is_resolved {
        DisplayState::Resolved
    } else if is_ended_at(raffle, now) {
        DisplayState::Ended
    } else {
        DisplayState::Active
    }
}

pub fn display_state(raffle: &Raffle) -> DisplayState {
    display_state_at(raffle, Utc::now())
}

/// Whether new entries are accepted: neither resolved nor ended.
pub fn can_enter_at(raffle: &Raffle, now: DateTime<Utc>) -> bool {
    display_state_at(raffle, now) == DisplayState::Active
}

pub fn can_enter(raffle: &Raffle) -> bool {
    can_enter_at(raffle, Utc::now())
}

/// Whether `viewer` may trigger winner selection.
///
/// Requires a bound viewer who created the raffle (address comparison is
/// case-insensitive), an unresolved raffle and at least one participant. The
/// end date is not consulted.
pub fn can_select_winners(
    raffle: &Raffle,
    viewer: Option<&Address>,
    participant_count: u64,
) -> bool {
    let is_creator = viewer.is_some_and(|v| v.matches(&raffle.creator));
    is_creator && !raffle.is_resolved && participant_count >= 1
}
