//! Static card table and deck construction.

use rand::{seq::SliceRandom, Rng};
use uuid::Uuid;

use crate::game::types::*;

/// Cards in a freshly built deck.
pub const DECK_SIZE: usize = 60;

struct CreatureDef {
    id: &'static str,
    name: &'static str,
    attack: i32,
    hp: i32,
    cost: u32,
    abilities: Abilities,
}

struct SpellDef {
    id: &'static str,
    name: &'static str,
    cost: u32,
    effect: SpellEffect,
    pattern: Pattern,
}

struct TrapDef {
    id: &'static str,
    name: &'static str,
    cost: u32,
    effect: TrapEffect,
}

const NONE: Abilities = Abilities::empty();

const CREATURES: &[CreatureDef] = &[
    CreatureDef { id: "soldier", name: "Soldier", attack: 2, hp: 3, cost: 1, abilities: NONE },
    CreatureDef { id: "archer", name: "Archer", attack: 3, hp: 2, cost: 2, abilities: Abilities::SHOOTER },
    CreatureDef { id: "dragon", name: "Dragon", attack: 4, hp: 4, cost: 4, abilities: Abilities::FLY },
    CreatureDef { id: "knight", name: "Knight", attack: 3, hp: 4, cost: 3, abilities: NONE },
    CreatureDef { id: "scout", name: "Scout", attack: 2, hp: 2, cost: 1, abilities: Abilities::HASTE },
    CreatureDef {
        id: "phoenix",
        name: "Phoenix",
        attack: 3,
        hp: 3,
        cost: 4,
        abilities: Abilities::FLY.union(Abilities::HASTE),
    },
    CreatureDef { id: "sniper", name: "Sniper", attack: 4, hp: 1, cost: 2, abilities: Abilities::SHOOTER },
    CreatureDef { id: "guardian", name: "Guardian", attack: 1, hp: 6, cost: 2, abilities: NONE },
    CreatureDef {
        id: "hawk",
        name: "Hawk",
        attack: 2,
        hp: 2,
        cost: 3,
        abilities: Abilities::FLY.union(Abilities::SHOOTER),
    },
    CreatureDef { id: "berserker", name: "Berserker", attack: 5, hp: 2, cost: 3, abilities: Abilities::HASTE },
    CreatureDef { id: "goblin", name: "Goblin", attack: 1, hp: 1, cost: 1, abilities: NONE },
    CreatureDef { id: "orc", name: "Orc", attack: 3, hp: 3, cost: 2, abilities: NONE },
    CreatureDef { id: "wolf", name: "Wolf", attack: 2, hp: 1, cost: 1, abilities: Abilities::HASTE },
];

const SPELLS: &[SpellDef] = &[
    SpellDef { id: "fireball", name: "Fireball", cost: 2, effect: SpellEffect::Damage(3), pattern: Pattern::Single },
    SpellDef { id: "lightning", name: "Lightning", cost: 1, effect: SpellEffect::Damage(2), pattern: Pattern::Single },
    SpellDef { id: "firestorm", name: "Firestorm", cost: 3, effect: SpellEffect::Damage(2), pattern: Pattern::Cross },
    SpellDef { id: "heal", name: "Heal", cost: 1, effect: SpellEffect::Heal(3), pattern: Pattern::Single },
    SpellDef { id: "renewal", name: "Renewal", cost: 2, effect: SpellEffect::Heal(2), pattern: Pattern::Cross },
];

const TRAPS: &[TrapDef] = &[
    TrapDef { id: "spike", name: "Spikes", cost: 1, effect: TrapEffect::Damage(2) },
    TrapDef { id: "poison", name: "Poison", cost: 1, effect: TrapEffect::Damage(1) },
    TrapDef { id: "stun", name: "Paralysis", cost: 2, effect: TrapEffect::Stun },
    TrapDef { id: "counter", name: "Riposte", cost: 2, effect: TrapEffect::Damage(2) },
];

impl CreatureDef {
    fn instantiate(&self) -> Creature {
        Creature::new(self.id, self.name, self.attack, self.hp, self.cost, self.abilities)
    }
}

impl SpellDef {
    fn instantiate(&self) -> Spell {
        Spell {
            uid: Uuid::new_v4(),
            id: self.id.to_owned(),
            name: self.name.to_owned(),
            cost: self.cost,
            effect: self.effect,
            pattern: self.pattern,
        }
    }
}

impl TrapDef {
    fn instantiate(&self) -> Trap {
        Trap {
            uid: Uuid::new_v4(),
            id: self.id.to_owned(),
            name: self.name.to_owned(),
            cost: self.cost,
            effect: self.effect,
        }
    }
}

/// Fresh instance of the card with catalogue id `id`.
pub fn card(id: &str) -> Option<Card> {
    if let Some(def) = CREATURES.iter().find(|d| d.id == id) {
        return Some(Card::Creature(def.instantiate()));
    }
    if let Some(def) = SPELLS.iter().find(|d| d.id == id) {
        return Some(Card::Spell(def.instantiate()));
    }
    TRAPS
        .iter()
        .find(|d| d.id == id)
        .map(|def| Card::Trap(def.instantiate()))
}

/// Fresh creature instance; `None` if `id` is not a creature.
pub fn creature(id: &str) -> Option<Creature> {
    match card(id)? {
        Card::Creature(c) => Some(c),
        _ => None,
    }
}

/// Random 60-card deck: roughly 65% creatures, 20% spells, 15% traps.
pub fn build_deck<R: Rng>(rng: &mut R) -> Vec<Card> {
    let mut deck: Vec<Card> = (0..DECK_SIZE)
        .map(|_| {
            let roll: f64 = rng.random();
            if roll < 0.65 {
                Card::Creature(CREATURES[rng.random_range(0..CREATURES.len())].instantiate())
            } else if roll < 0.85 {
                Card::Spell(SPELLS[rng.random_range(0..SPELLS.len())].instantiate())
            } else {
                Card::Trap(TRAPS[rng.random_range(0..TRAPS.len())].instantiate())
            }
        })
        .collect();
    deck.shuffle(rng);
    deck
}
