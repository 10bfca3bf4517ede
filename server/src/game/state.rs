//! Persistent per-room game records.

use rand::Rng;
use serde::Serialize;

use crate::game::{
    catalog,
    snapshot::PlanningBaseline,
    types::*,
};

pub const STARTING_HERO_HP: i32 = 20;
pub const ENERGY_CAP: u32 = 10;
pub const HAND_LIMIT: usize = 10;
pub const OPENING_HAND: usize = 7;

pub type Board = [[Option<Creature>; COLS]; ROWS];

/// Outcome of a single draw.
#[derive(Debug, Clone, PartialEq)]
pub enum Draw {
    ToHand(Card),
    /// Hand was full; the card went straight to the graveyard.
    Burned(Card),
    PileEmpty,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub hero_hp: i32,
    pub energy: u32,
    pub max_energy: u32,
    /// Top of the pile is the end of the vector.
    pub deck: Vec<Card>,
    pub hand: Vec<Card>,
    pub field: Board,
    pub traps: [Option<Trap>; ROWS],
    pub graveyard: Vec<Card>,
    pub ready: bool,
    pub pending: Vec<PendingAction>,
    #[serde(skip)]
    pub baseline: PlanningBaseline,
}

impl PlayerState {
    /// Deals the opening hand off the top of `deck`.
    pub fn new(mut deck: Vec<Card>) -> Self {
        let keep = deck.len().saturating_sub(OPENING_HAND);
        let mut hand = deck.split_off(keep);
        hand.reverse();
        let mut player = PlayerState {
            hero_hp: STARTING_HERO_HP,
            energy: 1,
            max_energy: 1,
            deck,
            hand,
            field: Default::default(),
            traps: Default::default(),
            graveyard: Vec::new(),
            ready: false,
            pending: Vec::new(),
            baseline: PlanningBaseline::default(),
        };
        player.baseline = PlanningBaseline::capture(&player);
        player
    }

    pub fn is_defeated(&self) -> bool {
        self.hero_hp <= 0
    }

    pub fn creature(&self, pos: SlotPos) -> Option<&Creature> {
        self.field.get(pos.row)?.get(pos.col)?.as_ref()
    }

    pub fn creature_mut(&mut self, pos: SlotPos) -> Option<&mut Creature> {
        self.field.get_mut(pos.row)?.get_mut(pos.col)?.as_mut()
    }

    /// Draws the top card; a full hand sends it to the graveyard instead.
    pub fn draw(&mut self) -> Draw {
        let Some(mut card) = self.deck.pop() else {
            return Draw::PileEmpty;
        };
        if let Card::Creature(c) = &mut card {
            c.refresh();
        }
        if self.hand.len() >= HAND_LIMIT {
            self.graveyard.push(card.clone());
            Draw::Burned(card)
        } else {
            self.hand.push(card.clone());
            Draw::ToHand(card)
        }
    }

    /// Removes a creature from the field into the graveyard.
    pub fn bury(&mut self, pos: SlotPos) -> Option<Creature> {
        let dead = self.field.get_mut(pos.row)?.get_mut(pos.col)?.take()?;
        self.graveyard.push(Card::Creature(dead.clone()));
        Some(dead)
    }

    pub fn creatures_mut(&mut self) -> impl Iterator<Item = &mut Creature> {
        self.field.iter_mut().flatten().flatten()
    }
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub round: u32,
    pub phase: Phase,
    pub time_left: u32,
    pub players: [PlayerState; 2],
}

impl GameState {
    pub fn new(deck_one: Vec<Card>, deck_two: Vec<Card>, turn_time: u32) -> Self {
        GameState {
            round: 1,
            phase: Phase::Planning,
            time_left: turn_time,
            players: [PlayerState::new(deck_one), PlayerState::new(deck_two)],
        }
    }

    /// Two freshly shuffled catalogue decks.
    pub fn random<R: Rng>(rng: &mut R, turn_time: u32) -> Self {
        let one = catalog::build_deck(rng);
        let two = catalog::build_deck(rng);
        GameState::new(one, two, turn_time)
    }

    pub fn player(&self, seat: Seat) -> &PlayerState {
        &self.players[seat.index()]
    }

    pub fn player_mut(&mut self, seat: Seat) -> &mut PlayerState {
        &mut self.players[seat.index()]
    }

    /// `(seat's player, opponent)` borrowed together.
    pub fn sides_mut(&mut self, seat: Seat) -> (&mut PlayerState, &mut PlayerState) {
        let [one, two] = &mut self.players;
        match seat {
            Seat::One => (one, two),
            Seat::Two => (two, one),
        }
    }

    pub fn both_ready(&self) -> bool {
        self.players.iter().all(|p| p.ready)
    }

    /// `Some(winner)` once a hero has fallen; `Some(None)` on a double knock-out.
    pub fn verdict(&self) -> Option<Option<Seat>> {
        match (self.player(Seat::One).is_defeated(), self.player(Seat::Two).is_defeated()) {
            (false, false) => None,
            (true, true) => Some(None),
            (true, false) => Some(Some(Seat::Two)),
            (false, true) => Some(Some(Seat::One)),
        }
    }
}
