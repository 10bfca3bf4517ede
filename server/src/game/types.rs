use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Rows per board.
pub const ROWS: usize = 4;
/// Columns per board.
pub const COLS: usize = 2;
/// Protected column, reachable by fliers and shooters only.
pub const BACK: usize = 0;
/// Melee-exposed column.
pub const FRONT: usize = 1;

/// Player seat, serialised as `1` or `2`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(into = "u8", try_from = "u8")]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    pub const BOTH: [Seat; 2] = [Seat::One, Seat::Two];

    pub fn index(self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }

    pub fn opponent(self) -> Seat {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }

    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }
}

impl From<Seat> for u8 {
    fn from(seat: Seat) -> u8 {
        seat.number()
    }
}

impl TryFrom<u8> for Seat {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Seat::One),
            2 => Ok(Seat::Two),
            other => Err(format!("no player {other}")),
        }
    }
}

bitflags! {
    /// Creature keywords.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Abilities: u8 {
        const FLY = 1;
        const SHOOTER = 1 << 1;
        const HASTE = 1 << 2;
    }
}

/// A cell on one player's board.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotPos {
    pub row: usize,
    pub col: usize,
}

impl SlotPos {
    pub fn new(row: usize, col: usize) -> Self {
        SlotPos { row, col }
    }

    pub fn in_bounds(self) -> bool {
        self.row < ROWS && self.col < COLS
    }

    /// Slots in combat order: row-major, back column first.
    pub fn all() -> impl Iterator<Item = SlotPos> {
        (0..ROWS * COLS).map(|i| SlotPos::new(i / COLS, i % COLS))
    }

    /// Board letter `A`..`H` (row r, column c ↦ `2r + c`).
    pub fn letter(self) -> char {
        (b'A' + (self.row * COLS + self.col) as u8) as char
    }

    /// Orthogonal neighbours that lie on the same board.
    pub fn neighbours(self) -> Vec<SlotPos> {
        let mut out = Vec::with_capacity(3);
        if self.row > 0 {
            out.push(SlotPos::new(self.row - 1, self.col));
        }
        if self.row + 1 < ROWS {
            out.push(SlotPos::new(self.row + 1, self.col));
        }
        out.push(SlotPos::new(self.row, 1 - self.col));
        out
    }
}

/// A creature, in hand or on the field.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Creature {
    pub uid: Uuid,
    pub id: String,
    pub name: String,
    pub attack: i32,
    pub hp: i32,
    pub current_hp: i32,
    pub cost: u32,
    pub abilities: Abilities,
    pub can_attack: bool,
    /// Caught by a stun trap: neither attacks nor strikes back this round.
    #[serde(default)]
    pub stunned: bool,
    pub moved_this_turn: bool,
    pub rounds_on_field: u32,
}

impl Creature {
    pub fn new(id: &str, name: &str, attack: i32, hp: i32, cost: u32, abilities: Abilities) -> Self {
        Creature {
            uid: Uuid::new_v4(),
            id: id.to_owned(),
            name: name.to_owned(),
            attack,
            hp,
            current_hp: hp,
            cost,
            abilities,
            can_attack: false,
            stunned: false,
            moved_this_turn: false,
            rounds_on_field: 0,
        }
    }

    pub fn flies(&self) -> bool {
        self.abilities.contains(Abilities::FLY)
    }

    pub fn shoots(&self) -> bool {
        self.abilities.contains(Abilities::SHOOTER)
    }

    pub fn has_haste(&self) -> bool {
        self.abilities.contains(Abilities::HASTE)
    }

    pub fn is_dead(&self) -> bool {
        self.current_hp <= 0
    }

    /// Placement eligibility for a column.
    ///
    /// Fliers go anywhere. Shooters are held to the back column, everyone
    /// else to the front.
    pub fn fits(&self, col: usize) -> bool {
        if self.flies() {
            return col < COLS;
        }
        match col {
            BACK => self.shoots(),
            FRONT => !self.shoots(),
            _ => false,
        }
    }

    /// Back to printed stats, not yet battle-ready.
    pub fn refresh(&mut self) {
        self.current_hp = self.hp;
        self.can_attack = false;
        self.stunned = false;
        self.moved_this_turn = false;
        self.rounds_on_field = 0;
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Pattern {
    Single,
    /// Designated slot plus its orthogonal neighbours on the same board.
    Cross,
}

impl Pattern {
    pub fn cells(self, center: SlotPos) -> Vec<SlotPos> {
        let mut cells = vec![center];
        if self == Pattern::Cross {
            cells.extend(center.neighbours());
        }
        cells
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "kind", content = "amount", rename_all = "camelCase")]
pub enum SpellEffect {
    Damage(i32),
    Heal(i32),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Spell {
    pub uid: Uuid,
    pub id: String,
    pub name: String,
    pub cost: u32,
    pub effect: SpellEffect,
    pub pattern: Pattern,
}

impl Spell {
    pub fn is_offensive(&self) -> bool {
        matches!(self.effect, SpellEffect::Damage(_))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "kind", content = "amount", rename_all = "camelCase")]
pub enum TrapEffect {
    Damage(i32),
    Stun,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trap {
    pub uid: Uuid,
    pub id: String,
    pub name: String,
    pub cost: u32,
    pub effect: TrapEffect,
}

/// Any card that can sit in a pile, hand or graveyard.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Card {
    Creature(Creature),
    Spell(Spell),
    Trap(Trap),
}

impl Card {
    pub fn uid(&self) -> Uuid {
        match self {
            Card::Creature(c) => c.uid,
            Card::Spell(s) => s.uid,
            Card::Trap(t) => t.uid,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Card::Creature(c) => &c.name,
            Card::Spell(s) => &s.name,
            Card::Trap(t) => &t.name,
        }
    }

    pub fn cost(&self) -> u32 {
        match self {
            Card::Creature(c) => c.cost,
            Card::Spell(s) => s.cost,
            Card::Trap(t) => t.cost,
        }
    }
}

/// Room life-cycle.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Planning,
    Resolution,
    GameOver,
}

/// Resolution category, in drain order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    Move,
    Place,
    Heal,
    Damage,
    Trap,
}

impl ActionKind {
    pub const ORDER: [ActionKind; 5] = [
        ActionKind::Move,
        ActionKind::Place,
        ActionKind::Heal,
        ActionKind::Damage,
        ActionKind::Trap,
    ];
}

/// A planned action, recorded by value when it was accepted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PendingAction {
    Place {
        creature: Creature,
        slot: SlotPos,
    },
    Move {
        creature: Creature,
        from: SlotPos,
        to: SlotPos,
    },
    Spell {
        spell: Spell,
        target: Seat,
        slot: SlotPos,
    },
    Trap {
        trap: Trap,
        row: usize,
    },
}

impl PendingAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            PendingAction::Move { .. } => ActionKind::Move,
            PendingAction::Place { .. } => ActionKind::Place,
            PendingAction::Spell { spell, .. } if spell.is_offensive() => ActionKind::Damage,
            PendingAction::Spell { .. } => ActionKind::Heal,
            PendingAction::Trap { .. } => ActionKind::Trap,
        }
    }
}
