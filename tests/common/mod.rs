//! In-memory raffle ledger for integration tests.
//!
//! Behaves like the deployed contract: global username registry, hidden entry
//! reasons until resolution, creator-only winner selection. Reads come back
//! in the transport's native map shape so normalization is exercised.
//! Writes take effect when their transaction is accepted.

#![allow(dead_code)]

use raffle_sdk::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

pub const CONTRACT: &str = "0x00000000000000000000000000000000000000cc";
pub const ALICE: &str = "0x00000000000000000000000000000000000000aa";
pub const BOB: &str = "0x00000000000000000000000000000000000000bb";

#[derive(Debug, Clone)]
struct StoredRaffle {
    creator: String,
    reason: String,
    prize: String,
    num_winners: u64,
    created_at: String,
    end_date: String,
    is_resolved: bool,
}

#[derive(Debug, Clone)]
struct StoredEntry {
    reason: String,
    entry_timestamp: String,
    is_winner: bool,
}

#[derive(Debug, Clone)]
struct PendingTx {
    from: String,
    method: String,
    args: Vec<serde_json::Value>,
    polls_left: u32,
    status: Option<&'static str>,
}

#[derive(Debug, Default)]
struct State {
    counter: u64,
    raffles: BTreeMap<String, StoredRaffle>,
    entries: BTreeMap<String, BTreeMap<String, StoredEntry>>,
    winners: BTreeMap<String, Vec<String>>,
    usernames: BTreeSet<String>,
    txs: HashMap<String, PendingTx>,
    calls: HashMap<String, usize>,
    sends: usize,
    polls: usize,
    fail_reads: bool,
    fail_sends: bool,
    pending_polls: u32,
    list_shaped: bool,
}

/// Cheap to clone; clones share state so a test can keep a handle after
/// moving one into the client.
#[derive(Clone, Default)]
pub struct FakeLedger {
    state: Arc<Mutex<State>>,
}

impl FakeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every read fails at the transport level.
    pub fn fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    pub fn fail_sends(&self, fail: bool) {
        self.state.lock().unwrap().fail_sends = fail;
    }

    /// Collection reads come back as plain lists instead of keyed maps.
    pub fn list_shaped(&self, list: bool) {
        self.state.lock().unwrap().list_shaped = list;
    }

    /// Status polls report pending this many times before deciding.
    pub fn pending_polls(&self, polls: u32) {
        self.state.lock().unwrap().pending_polls = polls;
    }

    pub fn calls(&self, method: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(method)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.state.lock().unwrap().calls.values().sum()
    }

    pub fn sends(&self) -> usize {
        self.state.lock().unwrap().sends
    }

    pub fn polls(&self) -> usize {
        self.state.lock().unwrap().polls
    }

    /// Store a raffle directly, bypassing the write path.
    pub fn seed_raffle(&self, creator: &str, end_date: &str) -> String {
        let mut state = self.state.lock().unwrap();
        state.counter += 1;
        let id = state.counter.to_string();
        state.raffles.insert(
            id.clone(),
            StoredRaffle {
                creator: creator.to_string(),
                reason: "Best pun wins".to_string(),
                prize: "$50".to_string(),
                num_winners: 1,
                created_at: "2026-01-01T00:00:00.000Z".to_string(),
                end_date: end_date.to_string(),
                is_resolved: false,
            },
        );
        state.entries.insert(id.clone(), BTreeMap::new());
        id
    }

    /// Register an entry directly, bypassing the write path.
    pub fn seed_entry(&self, raffle_id: &str, username: &str) {
        let mut state = self.state.lock().unwrap();
        state.usernames.insert(username.to_string());
        state.entries.entry(raffle_id.to_string()).or_default().insert(
            username.to_string(),
            StoredEntry {
                reason: "I love puns".to_string(),
                entry_timestamp: "2026-01-02T00:00:00.000Z".to_string(),
                is_winner: false,
            },
        );
    }
}

fn map(pairs: Vec<(&str, RawValue)>) -> RawValue {
    RawValue::Map(
        pairs
            .into_iter()
            .map(|(k, v)| (RawValue::from(k), v))
            .collect(),
    )
}

fn arg(args: &[CallArg], index: usize) -> String {
    match args.get(index) {
        Some(CallArg::Str(s)) => s.clone(),
        Some(CallArg::Int(n)) => n.to_string(),
        None => String::new(),
    }
}

impl State {
    fn raffle_value(&self, id: &str, r: &StoredRaffle) -> RawValue {
        let winners = self
            .winners
            .get(id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(RawValue::from)
            .collect();
        map(vec![
            ("creator", RawValue::from(r.creator.as_str())),
            ("reason", RawValue::from(r.reason.as_str())),
            ("prize", RawValue::from(r.prize.as_str())),
            ("num_winners", RawValue::from(r.num_winners)),
            ("created_at", RawValue::from(r.created_at.as_str())),
            ("end_date", RawValue::from(r.end_date.as_str())),
            ("is_resolved", RawValue::from(r.is_resolved)),
            ("winners", RawValue::List(winners)),
        ])
    }

    fn read(&self, method: &str, args: &[CallArg]) -> Result<RawValue, TransportError> {
        let not_found = || TransportError::Rpc {
            code: -32000,
            message: "Raffle not found".to_string(),
        };
        let id = arg(args, 0);
        match method {
            "get_all_raffles" if self.list_shaped => Ok(RawValue::List(
                self.raffles
                    .iter()
                    .map(|(id, r)| self.raffle_value(id, r))
                    .collect(),
            )),
            "get_all_raffles" => Ok(RawValue::Map(
                self.raffles
                    .iter()
                    .map(|(id, r)| (RawValue::from(id.as_str()), self.raffle_value(id, r)))
                    .collect(),
            )),
            "get_raffle" => {
                let r = self.raffles.get(&id).ok_or_else(not_found)?;
                Ok(self.raffle_value(&id, r))
            }
            "get_participants" => {
                let r = self.raffles.get(&id).ok_or_else(not_found)?;
                let entries = self.entries.get(&id).cloned().unwrap_or_default();
                let records = entries.into_iter().map(|(username, e)| {
                    let reason = if r.is_resolved {
                        e.reason
                    } else {
                        HIDDEN_REASON.to_string()
                    };
                    let mut fields = vec![
                        ("reason", RawValue::from(reason)),
                        ("entry_timestamp", RawValue::from(e.entry_timestamp)),
                        ("is_winner", RawValue::from(e.is_winner)),
                    ];
                    if self.list_shaped {
                        fields.push(("username", RawValue::from(username.as_str())));
                    }
                    (RawValue::from(username), map(fields))
                });
                if self.list_shaped {
                    Ok(RawValue::List(records.map(|(_, record)| record).collect()))
                } else {
                    Ok(RawValue::Map(records.collect()))
                }
            }
            "get_winners" => {
                let r = self.raffles.get(&id).ok_or_else(not_found)?;
                if !r.is_resolved {
                    return Ok(RawValue::List(vec![]));
                }
                Ok(RawValue::List(
                    self.winners
                        .get(&id)
                        .cloned()
                        .unwrap_or_default()
                        .into_iter()
                        .map(RawValue::from)
                        .collect(),
                ))
            }
            "is_username_taken" => Ok(RawValue::from(self.usernames.contains(&id))),
            "get_participant_count" => {
                self.raffles.get(&id).ok_or_else(not_found)?;
                let count = self.entries.get(&id).map(|e| e.len()).unwrap_or(0);
                Ok(RawValue::from(count as u64))
            }
            other => Err(TransportError::Rpc {
                code: -32601,
                message: format!("Unknown method {other}"),
            }),
        }
    }

    /// Apply an accepted write. `Err` means the contract raised.
    fn execute(&mut self, tx: &PendingTx) -> Result<(), String> {
        let s = |i: usize| {
            tx.args
                .get(i)
                .map(|v| match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_default()
        };
        match tx.method.as_str() {
            "create_raffle" => {
                let num_winners: u64 = s(2).parse().map_err(|_| "bad num_winners")?;
                if num_winners < 1 {
                    return Err("Must have at least 1 winner".into());
                }
                self.counter += 1;
                let id = self.counter.to_string();
                self.raffles.insert(
                    id.clone(),
                    StoredRaffle {
                        creator: tx.from.clone(),
                        reason: s(0),
                        prize: s(1),
                        num_winners,
                        created_at: s(3),
                        end_date: s(4),
                        is_resolved: false,
                    },
                );
                self.entries.insert(id, BTreeMap::new());
                Ok(())
            }
            "enter_raffle" => {
                let id = s(0);
                let username = s(1);
                let raffle = self.raffles.get(&id).ok_or("Raffle not found")?;
                if raffle.is_resolved {
                    return Err("Raffle already resolved".into());
                }
                if self.usernames.contains(&username) {
                    return Err("Username already taken".into());
                }
                self.usernames.insert(username.clone());
                self.entries.entry(id).or_default().insert(
                    username,
                    StoredEntry {
                        reason: s(2),
                        entry_timestamp: s(3),
                        is_winner: false,
                    },
                );
                Ok(())
            }
            "select_winners" => {
                let id = s(0);
                let raffle = self.raffles.get_mut(&id).ok_or("Raffle not found")?;
                if !raffle.creator.eq_ignore_ascii_case(&tx.from) {
                    return Err("Only creator can select winners".into());
                }
                if raffle.is_resolved {
                    return Err("Raffle already resolved".into());
                }
                let entries = self.entries.entry(id.clone()).or_default();
                if entries.is_empty() {
                    return Err("Need at least 1 participant to select winners".into());
                }
                let picked: Vec<String> = entries
                    .keys()
                    .take(raffle.num_winners as usize)
                    .cloned()
                    .collect();
                for name in &picked {
                    if let Some(e) = entries.get_mut(name) {
                        e.is_winner = true;
                    }
                }
                raffle.is_resolved = true;
                self.winners.insert(id, picked);
                Ok(())
            }
            other => Err(format!("Unknown method {other}")),
        }
    }
}

impl LedgerTransport for FakeLedger {
    async fn call(
        &self,
        _contract: &Address,
        _from: Option<&Address>,
        method: &str,
        args: &[CallArg],
    ) -> Result<RawValue, TransportError> {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(method.to_string()).or_default() += 1;
        if state.fail_reads {
            return Err(TransportError::ServerError {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        state.read(method, args)
    }

    async fn send(
        &self,
        _contract: &Address,
        from: &Address,
        method: &str,
        args: &[CallArg],
    ) -> Result<TxHash, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.sends += 1;
        if state.fail_sends {
            return Err(TransportError::Rpc {
                code: -32000,
                message: "rejected".to_string(),
            });
        }
        let hash = format!("0x{:064x}", state.sends);
        let tx = PendingTx {
            from: from.as_str().to_string(),
            method: method.to_string(),
            args: args
                .iter()
                .map(|a| serde_json::to_value(a).unwrap())
                .collect(),
            polls_left: state.pending_polls,
            status: None,
        };
        state.txs.insert(hash.clone(), tx);
        Ok(TxHash::new(hash))
    }

    async fn transaction(&self, hash: &TxHash) -> Result<RawValue, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.polls += 1;
        let Some(mut tx) = state.txs.get(hash.as_str()).cloned() else {
            return Ok(RawValue::Null);
        };
        if tx.status.is_none() {
            if tx.polls_left > 0 {
                tx.polls_left -= 1;
            } else {
                tx.status = Some(match state.execute(&tx) {
                    Ok(()) => "ACCEPTED",
                    Err(_) => "CANCELED",
                });
            }
        }
        let status = tx.status.unwrap_or("PENDING");
        state.txs.insert(hash.as_str().to_string(), tx);
        Ok(map(vec![
            ("hash", RawValue::from(hash.as_str())),
            ("statusName", RawValue::from(status)),
        ]))
    }
}

/// A client bound to the fake ledger, acting as `account`, with a zero-wait
/// confirmation budget.
pub fn client(ledger: &FakeLedger, account: Option<&str>) -> RaffleClient<FakeLedger> {
    client_with_policy(ledger, account, ConfirmationPolicy::immediate(5))
}

pub fn client_with_policy(
    ledger: &FakeLedger,
    account: Option<&str>,
    policy: ConfirmationPolicy,
) -> RaffleClient<FakeLedger> {
    let mut builder = RaffleClientBuilder::default()
        .contract_address(CONTRACT)
        .confirmation(policy);
    if let Some(account) = account {
        builder = builder.account(account);
    }
    builder.build_with_transport(ledger.clone()).unwrap()
}

pub fn tomorrow() -> String {
    (chrono::Utc::now().date_naive() + chrono::Days::new(1))
        .format("%Y-%m-%d")
        .to_string()
}

pub fn yesterday() -> String {
    (chrono::Utc::now().date_naive() - chrono::Days::new(1))
        .format("%Y-%m-%d")
        .to_string()
}
