//! Conversion: ParticipantResponse → Participant.

use super::wire::ParticipantResponse;
use super::{Participant, ValidationError};
use serde_json::Value;

impl TryFrom<ParticipantResponse> for Participant {
    type Error = ValidationError;

    fn try_from(source: ParticipantResponse) -> Result<Self, Self::Error> {
        let username = source
            .username
            .filter(|u| !u.is_empty())
            .ok_or(ValidationError::MissingUsername)?;
        Ok(Participant {
            username,
            reason: source.reason,
            entry_timestamp: source.entry_timestamp,
            is_winner: source.is_winner,
        })
    }
}

impl TryFrom<Value> for Participant {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let response: ParticipantResponse = serde_json::from_value(value)
            .map_err(|e| ValidationError::Malformed(e.to_string()))?;
        response.try_into()
    }
}
