//! Conversion: RaffleResponse → Raffle (TryFrom + validation).

use super::wire::RaffleResponse;
use super::{Raffle, ValidationError};
use crate::shared::{Address, RaffleId};
use serde_json::Value;

impl TryFrom<RaffleResponse> for Raffle {
    type Error = ValidationError;

    fn try_from(source: RaffleResponse) -> Result<Self, Self::Error> {
        let mut errors: Vec<ValidationError> = Vec::new();

        let id = source
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| {
                errors.push(ValidationError::MissingId);
                String::new()
            });
        let creator = source
            .creator
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| {
                errors.push(ValidationError::MissingCreator);
                String::new()
            });

        let num_winners = match u32::try_from(source.num_winners) {
            Ok(n) if n >= 1 => n,
            _ => {
                errors.push(ValidationError::InvalidWinnerCount(source.num_winners));
                0
            }
        };

        if !source.is_resolved && !source.winners.is_empty() {
            errors.push(ValidationError::WinnersBeforeResolution);
        }
        if num_winners >= 1 && source.winners.len() > num_winners as usize {
            errors.push(ValidationError::TooManyWinners {
                winners: source.winners.len(),
                num_winners,
            });
        }

        if !errors.is_empty() {
            return Err(ValidationError::Multiple(id, errors));
        }

        Ok(Raffle {
            id: RaffleId::new(id),
            creator: Address::from(creator),
            reason: source.reason,
            prize: source.prize,
            num_winners,
            created_at: source.created_at,
            end_date: source.end_date,
            is_resolved: source.is_resolved,
            winners: source.winners,
        })
    }
}

impl TryFrom<Value> for Raffle {
    type Error = ValidationError;

    /// Decode a normalized record. The `id` must already be merged in.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let response: RaffleResponse = serde_json::from_value(value)
            .map_err(|e| ValidationError::Malformed(e.to_string()))?;
        response.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> Value {
        json!({
            "id": "0",
            "creator": "0x00000000000000000000000000000000000000aa",
            "reason": "Best pun wins",
            "prize": "$50",
            "num_winners": 1,
            "created_at": "2026-03-10T12:00:00.000Z",
            "end_date": "2026-03-11",
            "is_resolved": false,
            "winners": []
        })
    }

    #[test]
    fn test_valid_record() {
        let raffle = Raffle::try_from(record()).unwrap();
        assert_eq!(raffle.id.as_str(), "0");
        assert_eq!(raffle.num_winners, 1);
        assert!(!raffle.is_resolved);
        assert!(raffle.winners.is_empty());
    }

    #[test]
    fn test_string_winner_count_and_missing_prize() {
        let mut value = record();
        value["num_winners"] = json!("3");
        value.as_object_mut().unwrap().remove("prize");
        let raffle = Raffle::try_from(value).unwrap();
        assert_eq!(raffle.num_winners, 3);
        assert_eq!(raffle.prize, "");
    }

    #[test]
    fn test_winners_require_resolution() {
        let mut value = record();
        value["winners"] = json!(["alice_99"]);
        let err = Raffle::try_from(value).unwrap_err();
        assert!(err.to_string().contains("unresolved"));
    }

    #[test]
    fn test_winner_count_bound() {
        let mut value = record();
        value["is_resolved"] = json!(true);
        value["winners"] = json!(["a", "b"]);
        assert!(Raffle::try_from(value).is_err());
    }

    #[test]
    fn test_missing_id_and_zero_winners_collected() {
        let mut value = record();
        value.as_object_mut().unwrap().remove("id");
        value["num_winners"] = json!(0);
        match Raffle::try_from(value) {
            Err(ValidationError::Multiple(_, errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected multiple errors, got {other:?}"),
        }
    }

    #[test]
    fn test_non_object_is_malformed() {
        assert!(matches!(
            Raffle::try_from(json!("nope")),
            Err(ValidationError::Malformed(_))
        ));
    }
}
