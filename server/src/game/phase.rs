//! Phase transitions and the per-round countdown.

use tokio::time::{Duration, Instant};

use crate::game::{
    snapshot,
    state::{GameState, ENERGY_CAP},
    types::{Phase, Seat},
};

/// One-second ticking countdown for a planning phase.
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining: u32,
    next_tick: Instant,
}

impl Countdown {
    pub fn start(seconds: u32) -> Self {
        Countdown {
            remaining: seconds,
            next_tick: Instant::now() + Duration::from_secs(1),
        }
    }

    pub fn deadline(&self) -> Instant {
        self.next_tick
    }

    /// Consumes one second and returns what is left.
    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.next_tick += Duration::from_secs(1);
        self.remaining
    }
}

/// Marks `seat` ready. Returns `false` if nothing changed.
pub fn mark_ready(state: &mut GameState, seat: Seat) -> bool {
    if state.phase != Phase::Planning {
        return false;
    }
    let player = state.player_mut(seat);
    if player.ready {
        return false;
    }
    player.ready = true;
    true
}

/// Countdown expiry: both plans are final as they stand.
pub fn force_ready(state: &mut GameState) {
    for player in state.players.iter_mut() {
        player.ready = true;
    }
}

/// Planning → resolution. Returns `false` if the room was not planning, so a
/// second trigger in the same round does nothing.
pub fn enter_resolution(state: &mut GameState) -> bool {
    if state.phase != Phase::Planning {
        return false;
    }
    state.phase = Phase::Resolution;
    true
}

/// Resolution → planning of the next round.
pub fn advance_round(state: &mut GameState, turn_time: u32) {
    if state.phase != Phase::Resolution {
        return;
    }
    state.round += 1;
    for player in state.players.iter_mut() {
        player.max_energy = (player.max_energy + 1).min(ENERGY_CAP);
        player.energy = player.max_energy;
        player.ready = false;
        player.pending.clear();
        for creature in player.creatures_mut() {
            creature.moved_this_turn = false;
        }
    }
    state.phase = Phase::Planning;
    state.time_left = turn_time;
    snapshot::capture_baselines(state);
}
