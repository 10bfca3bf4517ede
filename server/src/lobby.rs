//! Room registry and session index.
//!
//! `rooms` maps a room code to its command channel and seat claims, and
//! `sessions` maps a socket session id to its room code and seat.
//!
//! A seat claim outlives the socket that made it: on disconnect the claim
//! keeps its resume token and only loses its session, so `resume_room` can
//! hand the seat to a new socket until the room task gives up on it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    config::RoomSettings,
    game::{
        session::{self, Outbox, RoomCmd},
        types::Seat,
    },
    protocol::ServerMsg,
};

pub type SessionId = Uuid;

const CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const CODE_LEN: usize = 6;

/// Why a room could not be entered.
#[derive(Debug, Error, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum JoinError {
    #[error("room not found")]
    RoomNotFound,
    #[error("room is full")]
    RoomFull,
    #[error("seat cannot be resumed")]
    SeatUnavailable,
}

/// Seat granted to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joined {
    pub code: String,
    pub seat: Seat,
    pub token: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub code: String,
    pub seat: Seat,
}

/// Public summary for the lobby pre-check.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RoomStatus {
    pub code: String,
    pub players: usize,
    pub open_seat: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
struct Claim {
    token: Uuid,
    session: Option<SessionId>,
}

struct RoomEntry {
    tx: tokio::sync::mpsc::Sender<RoomCmd>,
    claims: [Option<Claim>; 2],
    created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct Lobby {
    rooms: Arc<DashMap<String, RoomEntry>>,
    sessions: Arc<DashMap<SessionId, Binding>>,
    settings: RoomSettings,
}

/// Random 6-character base-36 room code.
pub fn room_code<R: Rng>(rng: &mut R) -> String {
    (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

impl Lobby {
    pub fn new(settings: RoomSettings) -> Self {
        Lobby {
            rooms: Arc::new(DashMap::new()),
            sessions: Arc::new(DashMap::new()),
            settings,
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn binding(&self, session: SessionId) -> Option<Binding> {
        self.sessions.get(&session).map(|b| b.value().clone())
    }

    pub fn status(&self, code: &str) -> Option<RoomStatus> {
        let code = code.trim().to_uppercase();
        self.rooms.get(&code).map(|entry| RoomStatus {
            code: code.clone(),
            players: entry.claims.iter().flatten().count(),
            open_seat: entry.claims[Seat::Two.index()].is_none(),
            created_at: entry.created_at,
        })
    }

    /// Opens a room with the caller in seat 1.
    pub async fn create_room(&self, session: SessionId, outbox: Outbox) -> Joined {
        self.disconnect(session).await;

        let token = Uuid::new_v4();
        let (code, tx) = loop {
            let code = room_code(&mut rand::rng());
            if let Entry::Vacant(slot) = self.rooms.entry(code.clone()) {
                let tx = session::spawn(code.clone(), self.settings, self.clone());
                slot.insert(RoomEntry {
                    tx: tx.clone(),
                    claims: [
                        Some(Claim {
                            token,
                            session: Some(session),
                        }),
                        None,
                    ],
                    created_at: Utc::now(),
                });
                break (code, tx);
            }
        };

        let joined = Joined {
            code,
            seat: Seat::One,
            token,
        };
        let _ = outbox.send(ServerMsg::RoomCreated {
            code: joined.code.clone(),
            player_num: joined.seat,
            token,
        });
        self.seat(session, &joined, tx, outbox).await;
        log::info!("Room {} created", joined.code);
        joined
    }

    /// Takes seat 2 of an existing room.
    pub async fn join_room(&self, session: SessionId, code: &str, outbox: Outbox) -> Result<Joined, JoinError> {
        self.disconnect(session).await;

        let code = code.trim().to_uppercase();
        let token = Uuid::new_v4();
        let tx = {
            let mut entry = self.rooms.get_mut(&code).ok_or(JoinError::RoomNotFound)?;
            let claim = &mut entry.claims[Seat::Two.index()];
            if claim.is_some() {
                return Err(JoinError::RoomFull);
            }
            *claim = Some(Claim {
                token,
                session: Some(session),
            });
            entry.tx.clone()
        };

        let joined = Joined {
            code,
            seat: Seat::Two,
            token,
        };
        let _ = outbox.send(ServerMsg::RoomJoined {
            code: joined.code.clone(),
            player_num: joined.seat,
            token,
        });
        self.seat(session, &joined, tx, outbox).await;
        Ok(joined)
    }

    /// Hands a vacated seat to a new socket holding its token.
    pub async fn resume_room(
        &self,
        session: SessionId,
        code: &str,
        token: Uuid,
        outbox: Outbox,
    ) -> Result<Joined, JoinError> {
        self.disconnect(session).await;

        let code = code.trim().to_uppercase();
        let (seat, tx) = {
            let mut entry = self.rooms.get_mut(&code).ok_or(JoinError::RoomNotFound)?;
            let seat = Seat::BOTH
                .into_iter()
                .find(|seat| {
                    entry.claims[seat.index()]
                        .as_ref()
                        .is_some_and(|c| c.token == token && c.session.is_none())
                })
                .ok_or(JoinError::SeatUnavailable)?;
            if let Some(claim) = entry.claims[seat.index()].as_mut() {
                claim.session = Some(session);
            }
            (seat, entry.tx.clone())
        };

        let joined = Joined { code, seat, token };
        let _ = outbox.send(ServerMsg::RoomJoined {
            code: joined.code.clone(),
            player_num: seat,
            token,
        });
        self.seat(session, &joined, tx, outbox).await;
        Ok(joined)
    }

    async fn seat(&self, session: SessionId, joined: &Joined, tx: tokio::sync::mpsc::Sender<RoomCmd>, outbox: Outbox) {
        self.sessions.insert(
            session,
            Binding {
                code: joined.code.clone(),
                seat: joined.seat,
            },
        );
        if tx
            .send(RoomCmd::Attach {
                seat: joined.seat,
                outbox,
            })
            .await
            .is_err()
        {
            log::warn!("Room {} is gone, could not seat session {session}", joined.code);
        }
    }

    /// Routes a command to the caller's room. Returns `false` if the session
    /// is not seated anywhere live.
    pub async fn forward(&self, session: SessionId, cmd: impl FnOnce(Seat) -> RoomCmd) -> bool {
        let Some(binding) = self.binding(session) else {
            return false;
        };
        let Some(tx) = self.rooms.get(&binding.code).map(|e| e.tx.clone()) else {
            self.sessions.remove(&session);
            return false;
        };
        tx.send(cmd(binding.seat)).await.is_ok()
    }

    /// Socket gone: free the session and start the seat's grace window.
    pub async fn disconnect(&self, session: SessionId) {
        let Some((_, binding)) = self.sessions.remove(&session) else {
            return;
        };
        let tx = {
            let Some(mut entry) = self.rooms.get_mut(&binding.code) else {
                return;
            };
            if let Some(claim) = entry.claims[binding.seat.index()].as_mut() {
                claim.session = None;
            }
            entry.tx.clone()
        };
        let _ = tx.send(RoomCmd::Detach { seat: binding.seat }).await;
    }

    /// Drops a room and every session still bound to it.
    pub(crate) fn release(&self, code: &str) {
        self.rooms.remove(code);
        self.sessions.retain(|_, binding| binding.code != code);
    }
}
