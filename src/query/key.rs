//! Query keys and the invalidation table.

use crate::error::WriteOperation;
use crate::shared::RaffleId;
use std::fmt;

/// Identity of one cached read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Raffles,
    Raffle(RaffleId),
    Participants(RaffleId),
    Winners(RaffleId),
    UsernameTaken(String),
    ParticipantCount(RaffleId),
}

/// Key family, without the per-raffle or per-username part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Raffles,
    Raffle,
    Participants,
    Winners,
    UsernameTaken,
    ParticipantCount,
}

impl QueryKey {
    pub fn kind(&self) -> QueryKind {
        match self {
            QueryKey::Raffles => QueryKind::Raffles,
            QueryKey::Raffle(_) => QueryKind::Raffle,
            QueryKey::Participants(_) => QueryKind::Participants,
            QueryKey::Winners(_) => QueryKind::Winners,
            QueryKey::UsernameTaken(_) => QueryKind::UsernameTaken,
            QueryKey::ParticipantCount(_) => QueryKind::ParticipantCount,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::Raffles => f.write_str("raffles"),
            QueryKey::Raffle(id) => write!(f, "raffle/{id}"),
            QueryKey::Participants(id) => write!(f, "participants/{id}"),
            QueryKey::Winners(id) => write!(f, "winners/{id}"),
            QueryKey::UsernameTaken(name) => write!(f, "checkUsername/{name}"),
            QueryKey::ParticipantCount(id) => write!(f, "participantCount/{id}"),
        }
    }
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Raffles => "raffles",
            QueryKind::Raffle => "raffle",
            QueryKind::Participants => "participants",
            QueryKind::Winners => "winners",
            QueryKind::UsernameTaken => "checkUsername",
            QueryKind::ParticipantCount => "participantCount",
        }
    }
}

/// What a confirmed write marks stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalidation {
    Key(QueryKey),
    Kind(QueryKind),
}

impl Invalidation {
    pub fn covers(&self, key: &QueryKey) -> bool {
        match self {
            Invalidation::Key(k) => k == key,
            Invalidation::Kind(kind) => key.kind() == *kind,
        }
    }
}

/// Entries a confirmed write invalidates.
///
/// | write            | invalidated                                          |
/// |------------------|------------------------------------------------------|
/// | create raffle    | raffles                                              |
/// | enter raffle     | raffles, participants/id, participantCount/id, every username check |
/// | select winners   | raffles, raffle/id, participants/id, winners/id      |
pub fn invalidations(op: WriteOperation, raffle_id: Option<&RaffleId>) -> Vec<Invalidation> {
    let mut table = vec![Invalidation::Key(QueryKey::Raffles)];
    if op == WriteOperation::EnterRaffle {
        table.push(Invalidation::Kind(QueryKind::UsernameTaken));
    }
    if let Some(id) = raffle_id {
        let keys = match op {
            WriteOperation::CreateRaffle => vec![],
            WriteOperation::EnterRaffle => vec![
                QueryKey::Participants(id.clone()),
                QueryKey::ParticipantCount(id.clone()),
            ],
            WriteOperation::SelectWinners => vec![
                QueryKey::Raffle(id.clone()),
                QueryKey::Participants(id.clone()),
                QueryKey::Winners(id.clone()),
            ],
        };
        table.extend(keys.into_iter().map(Invalidation::Key));
    }
    table
}
