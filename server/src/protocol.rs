//! Wire-protocol shared by client, WS handler and room task.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    game::{
        actions::PlanRequest,
        snapshot::PlayerView,
        targeting::Target,
        types::{Creature, Phase, Seat, SlotPos},
    },
    lobby::JoinError,
};

// ---------- client → server ----------
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMsg {
    CreateRoom,
    JoinRoom {
        code: String,
    },
    /// Reclaims a seat left by a dropped socket.
    ResumeRoom {
        code: String,
        token: Uuid,
    },
    PlaceCard {
        hand_index: usize,
        row: usize,
        col: usize,
    },
    MoveCard {
        from_row: usize,
        from_col: usize,
        to_row: usize,
        to_col: usize,
    },
    CastSpell {
        hand_index: usize,
        target_player: u8,
        row: usize,
        col: usize,
    },
    PlaceTrap {
        hand_index: usize,
        trap_row: usize,
    },
    Ready,
}

impl ClientMsg {
    /// The planning request carried by this message, if any.
    pub fn plan(&self) -> Option<PlanRequest> {
        let request = match *self {
            ClientMsg::PlaceCard { hand_index, row, col } => PlanRequest::Place {
                hand_index,
                slot: SlotPos::new(row, col),
            },
            ClientMsg::MoveCard {
                from_row,
                from_col,
                to_row,
                to_col,
            } => PlanRequest::Move {
                from: SlotPos::new(from_row, from_col),
                to: SlotPos::new(to_row, to_col),
            },
            ClientMsg::CastSpell {
                hand_index,
                target_player,
                row,
                col,
            } => PlanRequest::Spell {
                hand_index,
                target: target_player,
                slot: SlotPos::new(row, col),
            },
            ClientMsg::PlaceTrap { hand_index, trap_row } => PlanRequest::Trap {
                hand_index,
                row: trap_row,
            },
            _ => return None,
        };
        Some(request)
    }
}

/// Narration category of a resolution log line.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LogKind {
    Phase,
    Action,
    Spell,
    Trap,
    Damage,
    Heal,
}

/// Semantic event for the receiving end to animate.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Animation {
    Move {
        player: Seat,
        from: SlotPos,
        to: SlotPos,
    },
    Summon {
        player: Seat,
        slot: SlotPos,
        creature: Creature,
    },
    Spell {
        caster: Seat,
        target_player: Seat,
        slot: SlotPos,
        spell_id: String,
    },
    SpellMissed {
        caster: Seat,
        target_player: Seat,
        slot: SlotPos,
    },
    Damage {
        player: Seat,
        slot: SlotPos,
        amount: i32,
    },
    Heal {
        player: Seat,
        slot: SlotPos,
        amount: i32,
    },
    Death {
        player: Seat,
        slot: SlotPos,
    },
    Attack {
        player: Seat,
        from: SlotPos,
        target: Target,
        damage: i32,
    },
    CounterAttack {
        player: Seat,
        from: SlotPos,
        to: SlotPos,
        damage: i32,
    },
    TrapTrigger {
        owner: Seat,
        row: usize,
        victim: SlotPos,
    },
    TrapPlace {
        player: Seat,
        row: usize,
    },
}

// ---------- server → client ----------
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMsg {
    RoomCreated {
        code: String,
        player_num: Seat,
        token: Uuid,
    },
    RoomJoined {
        code: String,
        player_num: Seat,
        token: Uuid,
    },
    JoinFailed {
        error: JoinError,
        reason: String,
    },
    GameStart {
        state: PlayerView,
    },
    GameStateUpdate {
        state: PlayerView,
    },
    PhaseChange {
        phase: Phase,
    },
    TimerUpdate {
        seconds: u32,
    },
    PlayerReady {
        player: Seat,
    },
    ResolutionLog {
        msg: String,
        kind: LogKind,
    },
    Animation {
        event: Animation,
    },
    DirectDamage {
        defender: Seat,
        damage: i32,
    },
    NewTurn {
        turn: u32,
        max_energy: u32,
    },
    GameOver {
        winner: Option<Seat>,
    },
    PlayerDisconnected {
        player: Seat,
    },
    PlayerReconnected {
        player: Seat,
    },
}
