//! Per-player views of a room, with the opponent's unresolved plan redacted.
//!
//! While a room is planning, everything a player learns about the opponent
//! comes from the [`PlanningBaseline`] captured when that planning phase
//! began, never from the live records the opponent is editing.

use serde::{Deserialize, Serialize};

use crate::game::{
    state::{Board, GameState, PlayerState},
    types::*,
};

/// Opponent-visible facts frozen at the start of a planning phase.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PlanningBaseline {
    pub field: Board,
    pub trap_count: usize,
    pub energy: u32,
    pub hand_count: usize,
}

impl PlanningBaseline {
    pub fn capture(player: &PlayerState) -> Self {
        PlanningBaseline {
            field: player.field.clone(),
            trap_count: player.traps.iter().flatten().count(),
            energy: player.energy,
            hand_count: player.hand.len(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OwnView {
    pub hp: i32,
    pub energy: u32,
    pub max_energy: u32,
    pub hand: Vec<Card>,
    pub deck_count: usize,
    pub field: Board,
    pub traps: [Option<Trap>; ROWS],
    pub graveyard_count: usize,
    pub ready: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OpponentView {
    pub hp: i32,
    pub energy: u32,
    pub max_energy: u32,
    pub hand_count: usize,
    pub deck_count: usize,
    pub field: Board,
    pub traps_count: usize,
    pub graveyard_count: usize,
    pub ready: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub turn: u32,
    pub phase: Phase,
    pub time_left: u32,
    pub my_player: Seat,
    pub me: OwnView,
    pub opponent: OpponentView,
}

/// Freezes both players' public facts; called whenever planning starts.
pub fn capture_baselines(state: &mut GameState) {
    for player in state.players.iter_mut() {
        player.baseline = PlanningBaseline::capture(player);
    }
}

pub fn player_view(state: &GameState, seat: Seat) -> PlayerView {
    let me = state.player(seat);
    let foe = state.player(seat.opponent());

    let opponent = if state.phase == Phase::Planning {
        OpponentView {
            hp: foe.hero_hp,
            energy: foe.baseline.energy,
            max_energy: foe.max_energy,
            hand_count: foe.baseline.hand_count,
            deck_count: foe.deck.len(),
            field: foe.baseline.field.clone(),
            traps_count: foe.baseline.trap_count,
            graveyard_count: foe.graveyard.len(),
            ready: foe.ready,
        }
    } else {
        OpponentView {
            hp: foe.hero_hp,
            energy: foe.energy,
            max_energy: foe.max_energy,
            hand_count: foe.hand.len(),
            deck_count: foe.deck.len(),
            field: foe.field.clone(),
            traps_count: foe.traps.iter().flatten().count(),
            graveyard_count: foe.graveyard.len(),
            ready: foe.ready,
        }
    };

    PlayerView {
        turn: state.round,
        phase: state.phase,
        time_left: state.time_left,
        my_player: seat,
        me: OwnView {
            hp: me.hero_hp,
            energy: me.energy,
            max_energy: me.max_energy,
            hand: me.hand.clone(),
            deck_count: me.deck.len(),
            field: me.field.clone(),
            traps: me.traps.clone(),
            graveyard_count: me.graveyard.len(),
            ready: me.ready,
        },
        opponent,
    }
}
