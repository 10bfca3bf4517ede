//! Planning-phase submissions: validate, apply to the submitter's own
//! records, and queue a by-value copy for the next resolution.

use thiserror::Error;

use crate::game::{state::GameState, types::*};

/// What a player asked to do, as decoded from the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanRequest {
    Place { hand_index: usize, slot: SlotPos },
    Move { from: SlotPos, to: SlotPos },
    Spell { hand_index: usize, target: u8, slot: SlotPos },
    Trap { hand_index: usize, row: usize },
}

/// Why a submission was dropped. Never reported to the client.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Rejected {
    #[error("room is not planning")]
    NotPlanning,
    #[error("player already ready")]
    AlreadyReady,
    #[error("no card at hand index {0}")]
    NoSuchCard(usize),
    #[error("card kind does not match the action")]
    WrongKind,
    #[error("costs {cost}, only {energy} energy left")]
    TooExpensive { cost: u32, energy: u32 },
    #[error("slot is off the board")]
    OffBoard,
    #[error("slot is occupied")]
    Occupied,
    #[error("nothing to move")]
    NothingThere,
    #[error("creature already moved this round")]
    AlreadyMoved,
    #[error("destination is not adjacent")]
    NotAdjacent,
    #[error("creature cannot stand in that column")]
    Ineligible,
    #[error("no player {0}")]
    NoSuchPlayer(u8),
}

/// Validates `request` for `seat` and applies it. On success the action has
/// been paid for, written to its destination and appended to the queue.
pub fn submit(state: &mut GameState, seat: Seat, request: PlanRequest) -> Result<ActionKind, Rejected> {
    if state.phase != Phase::Planning {
        return Err(Rejected::NotPlanning);
    }
    if state.player(seat).ready {
        return Err(Rejected::AlreadyReady);
    }

    let action = match request {
        PlanRequest::Place { hand_index, slot } => place(state, seat, hand_index, slot)?,
        PlanRequest::Move { from, to } => relocate(state, seat, from, to)?,
        PlanRequest::Spell {
            hand_index,
            target,
            slot,
        } => cast(state, seat, hand_index, target, slot)?,
        PlanRequest::Trap { hand_index, row } => set_trap(state, seat, hand_index, row)?,
    };

    let kind = action.kind();
    state.player_mut(seat).pending.push(action);
    Ok(kind)
}

fn affordable(card: &Card, energy: u32) -> Result<(), Rejected> {
    if card.cost() > energy {
        return Err(Rejected::TooExpensive {
            cost: card.cost(),
            energy,
        });
    }
    Ok(())
}

fn place(state: &mut GameState, seat: Seat, hand_index: usize, slot: SlotPos) -> Result<PendingAction, Rejected> {
    let player = state.player_mut(seat);
    let card = player.hand.get(hand_index).ok_or(Rejected::NoSuchCard(hand_index))?;
    let Card::Creature(creature) = card else {
        return Err(Rejected::WrongKind);
    };
    affordable(card, player.energy)?;
    if !slot.in_bounds() {
        return Err(Rejected::OffBoard);
    }
    if player.creature(slot).is_some() {
        return Err(Rejected::Occupied);
    }
    if !creature.fits(slot.col) {
        return Err(Rejected::Ineligible);
    }

    let Card::Creature(mut creature) = player.hand.remove(hand_index) else {
        unreachable!("card kind checked above");
    };
    player.energy -= creature.cost;
    creature.refresh();
    creature.can_attack = creature.has_haste();
    player.field[slot.row][slot.col] = Some(creature.clone());

    Ok(PendingAction::Place { creature, slot })
}

fn relocate(state: &mut GameState, seat: Seat, from: SlotPos, to: SlotPos) -> Result<PendingAction, Rejected> {
    if !from.in_bounds() || !to.in_bounds() {
        return Err(Rejected::OffBoard);
    }
    let player = state.player_mut(seat);
    let creature = player.creature(from).ok_or(Rejected::NothingThere)?;
    if creature.moved_this_turn {
        return Err(Rejected::AlreadyMoved);
    }
    if player.creature(to).is_some() {
        return Err(Rejected::Occupied);
    }

    let rows = from.row.abs_diff(to.row);
    let cols = from.col.abs_diff(to.col);
    let vertical = rows == 1 && cols == 0;
    let sideways = rows == 0 && cols == 1 && creature.flies();
    if !vertical && !sideways {
        return Err(Rejected::NotAdjacent);
    }
    if !creature.fits(to.col) {
        return Err(Rejected::Ineligible);
    }

    let mut creature = player.field[from.row][from.col]
        .take()
        .ok_or(Rejected::NothingThere)?;
    creature.moved_this_turn = true;
    if !creature.has_haste() {
        creature.can_attack = false;
        creature.rounds_on_field = 0;
    }
    player.field[to.row][to.col] = Some(creature.clone());

    Ok(PendingAction::Move { creature, from, to })
}

fn cast(
    state: &mut GameState,
    seat: Seat,
    hand_index: usize,
    target: u8,
    slot: SlotPos,
) -> Result<PendingAction, Rejected> {
    let target = Seat::try_from(target).map_err(|_| Rejected::NoSuchPlayer(target))?;
    if !slot.in_bounds() {
        return Err(Rejected::OffBoard);
    }
    let player = state.player_mut(seat);
    let card = player.hand.get(hand_index).ok_or(Rejected::NoSuchCard(hand_index))?;
    if !matches!(card, Card::Spell(_)) {
        return Err(Rejected::WrongKind);
    }
    affordable(card, player.energy)?;

    let Card::Spell(spell) = player.hand.remove(hand_index) else {
        unreachable!("card kind checked above");
    };
    player.energy -= spell.cost;

    Ok(PendingAction::Spell { spell, target, slot })
}

fn set_trap(state: &mut GameState, seat: Seat, hand_index: usize, row: usize) -> Result<PendingAction, Rejected> {
    let player = state.player_mut(seat);
    let card = player.hand.get(hand_index).ok_or(Rejected::NoSuchCard(hand_index))?;
    if !matches!(card, Card::Trap(_)) {
        return Err(Rejected::WrongKind);
    }
    affordable(card, player.energy)?;
    let cell = player.traps.get(row).ok_or(Rejected::OffBoard)?;
    if cell.is_some() {
        return Err(Rejected::Occupied);
    }

    let Card::Trap(trap) = player.hand.remove(hand_index) else {
        unreachable!("card kind checked above");
    };
    player.energy -= trap.cost;
    player.traps[row] = Some(trap.clone());

    Ok(PendingAction::Trap { trap, row })
}
