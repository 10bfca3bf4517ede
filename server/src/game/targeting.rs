//! Who a creature swings at.

use serde::{Deserialize, Serialize};

use crate::game::types::{Creature, BACK, FRONT};

/// Result of target selection within one row.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "kind", content = "col", rename_all = "camelCase")]
pub enum Target {
    /// Opposing creature in the given column of the same row.
    Creature(usize),
    Hero,
}

/// Picks the target of `attacker` given the two opposing slots of its row.
///
/// Fliers only engage fliers, shooters take the first occupied slot, and
/// ground creatures pass over fliers and empty rows to reach the hero.
pub fn resolve_target(
    attacker: &Creature,
    front: Option<&Creature>,
    back: Option<&Creature>,
) -> Target {
    if attacker.flies() {
        return match (front, back) {
            (Some(f), _) if f.flies() => Target::Creature(FRONT),
            (_, Some(b)) if b.flies() => Target::Creature(BACK),
            _ => Target::Hero,
        };
    }

    if attacker.shoots() {
        return match (front, back) {
            (Some(_), _) => Target::Creature(FRONT),
            (None, Some(_)) => Target::Creature(BACK),
            (None, None) => Target::Hero,
        };
    }

    match (front, back) {
        (Some(f), _) if !f.flies() => Target::Creature(FRONT),
        (_, Some(b)) if !b.flies() => Target::Creature(BACK),
        _ => Target::Hero,
    }
}
