//! Deterministic round resolution.
//!
//! [`resolve_round`] applies both queued plans, draws, runs combat and
//! checks for a winner in one synchronous pass. What the players should see
//! along the way is recorded as a script of [`Beat`]s, which the room task
//! plays back with the pacing pauses in between.

use crate::{
    game::{
        snapshot::player_view,
        state::{Draw, GameState},
        targeting::{resolve_target, Target},
        types::*,
    },
    protocol::{Animation, LogKind, ServerMsg},
};

/// One step of resolution playback.
#[derive(Debug, Clone, PartialEq)]
pub enum Beat {
    Broadcast(ServerMsg),
    Direct(Seat, ServerMsg),
    /// Pacing delay in milliseconds.
    Pause(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    NextRound,
    GameOver { winner: Option<Seat> },
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub beats: Vec<Beat>,
    pub outcome: Outcome,
}

#[derive(Default)]
struct Script {
    beats: Vec<Beat>,
}

impl Script {
    fn log(&mut self, kind: LogKind, msg: impl Into<String>) {
        self.beats.push(Beat::Broadcast(ServerMsg::ResolutionLog {
            msg: msg.into(),
            kind,
        }));
    }

    fn animate(&mut self, event: Animation) {
        self.beats.push(Beat::Broadcast(ServerMsg::Animation { event }));
    }

    fn animate_for(&mut self, seat: Seat, event: Animation) {
        self.beats.push(Beat::Direct(seat, ServerMsg::Animation { event }));
    }

    fn send(&mut self, msg: ServerMsg) {
        self.beats.push(Beat::Broadcast(msg));
    }

    /// Each player's view as it stands right now.
    fn sync(&mut self, state: &GameState) {
        for seat in Seat::BOTH {
            self.beats.push(Beat::Direct(
                seat,
                ServerMsg::GameStateUpdate {
                    state: player_view(state, seat),
                },
            ));
        }
    }

    fn pause(&mut self, ms: u64) {
        self.beats.push(Beat::Pause(ms));
    }
}

/// Resolves the current round. The room must already be in
/// [`Phase::Resolution`]; on a win the phase becomes [`Phase::GameOver`].
pub fn resolve_round(state: &mut GameState) -> Resolution {
    let mut script = Script::default();

    script.log(LogKind::Phase, format!("Resolving round {}", state.round));
    script.pause(500);

    apply_plans(state, &mut script);
    draw_phase(state, &mut script);

    script.log(LogKind::Phase, "Combat phase");
    script.pause(300);
    trigger_traps(state, &mut script);
    for pos in SlotPos::all() {
        fight_slot(state, pos, &mut script);
    }

    for player in state.players.iter_mut() {
        for creature in player.creatures_mut() {
            creature.can_attack = true;
            creature.stunned = false;
            creature.rounds_on_field += 1;
            creature.moved_this_turn = false;
        }
    }

    let outcome = match state.verdict() {
        Some(winner) => {
            state.phase = Phase::GameOver;
            script.pause(500);
            match winner {
                Some(seat) => script.log(LogKind::Phase, format!("Player {} wins!", seat.number())),
                None => script.log(LogKind::Phase, "Both heroes fell: draw"),
            }
            script.sync(state);
            script.send(ServerMsg::GameOver { winner });
            Outcome::GameOver { winner }
        }
        None => {
            script.sync(state);
            script.pause(800);
            Outcome::NextRound
        }
    };

    Resolution {
        beats: script.beats,
        outcome,
    }
}

/// Drains both queues category by category; within a category player one's
/// actions go first, each side in submission order.
fn apply_plans(state: &mut GameState, script: &mut Script) {
    let queues = Seat::BOTH.map(|seat| std::mem::take(&mut state.player_mut(seat).pending));

    for kind in ActionKind::ORDER {
        let mut any = false;
        for seat in Seat::BOTH {
            for action in queues[seat.index()].iter().filter(|a| a.kind() == kind) {
                any = true;
                match action {
                    PendingAction::Move { creature, from, to } => {
                        replay_move(script, seat, creature, *from, *to);
                        script.sync(state);
                        script.pause(300);
                    }
                    PendingAction::Place { creature, slot } => replay_summon(script, seat, creature, *slot),
                    PendingAction::Spell { spell, target, slot } => {
                        cast_spell(state, script, seat, spell, *target, *slot);
                    }
                    PendingAction::Trap { row, .. } => {
                        script.log(LogKind::Trap, format!("Player {} sets a trap", seat.number()));
                        script.animate_for(seat, Animation::TrapPlace { player: seat, row: *row });
                    }
                }
            }
        }
        if any && kind != ActionKind::Move {
            script.sync(state);
            script.pause(400);
        }
    }
}

fn replay_move(script: &mut Script, seat: Seat, creature: &Creature, from: SlotPos, to: SlotPos) {
    script.log(
        LogKind::Action,
        format!(
            "{} moves from {} to {}",
            creature.name,
            from.letter(),
            to.letter()
        ),
    );
    script.animate(Animation::Move { player: seat, from, to });
}

fn replay_summon(script: &mut Script, seat: Seat, creature: &Creature, slot: SlotPos) {
    script.log(
        LogKind::Action,
        format!("Player {} summons {} in {}", seat.number(), creature.name, slot.letter()),
    );
    script.animate(Animation::Summon {
        player: seat,
        slot,
        creature: creature.clone(),
    });
}

fn cast_spell(state: &mut GameState, script: &mut Script, caster: Seat, spell: &Spell, target: Seat, slot: SlotPos) {
    script.animate(Animation::Spell {
        caster,
        target_player: target,
        slot,
        spell_id: spell.id.clone(),
    });

    match spell.effect {
        SpellEffect::Heal(amount) => {
            if state.player(target).creature(slot).is_none() {
                script.log(LogKind::Spell, format!("{} fizzles: no target", spell.name));
                script.animate(Animation::SpellMissed {
                    caster,
                    target_player: target,
                    slot,
                });
            } else {
                for cell in spell.pattern.cells(slot) {
                    let Some(creature) = state.player_mut(target).creature_mut(cell) else {
                        continue;
                    };
                    let healed = ((creature.current_hp + amount).min(creature.hp) - creature.current_hp).max(0);
                    creature.current_hp += healed;
                    script.log(LogKind::Heal, format!("{} heals {} (+{healed})", spell.name, creature.name));
                    script.animate(Animation::Heal {
                        player: target,
                        slot: cell,
                        amount: healed,
                    });
                }
            }
        }
        SpellEffect::Damage(amount) => {
            let mut hit = false;
            for cell in spell.pattern.cells(slot) {
                let victim = state.player_mut(target);
                let Some(creature) = victim.creature_mut(cell) else {
                    continue;
                };
                hit = true;
                creature.current_hp -= amount;
                script.log(LogKind::Spell, format!("{} hits {} (-{amount})", spell.name, creature.name));
                script.animate(Animation::Damage {
                    player: target,
                    slot: cell,
                    amount,
                });
                if creature.is_dead() {
                    if let Some(dead) = victim.bury(cell) {
                        script.log(LogKind::Damage, format!("{} is destroyed", dead.name));
                        script.animate(Animation::Death { player: target, slot: cell });
                    }
                }
            }
            if !hit {
                script.log(LogKind::Spell, format!("{} hits nothing", spell.name));
                script.animate(Animation::SpellMissed {
                    caster,
                    target_player: target,
                    slot,
                });
            }
        }
    }

    state.player_mut(caster).graveyard.push(Card::Spell(spell.clone()));
}

fn draw_phase(state: &mut GameState, script: &mut Script) {
    for seat in Seat::BOTH {
        match state.player_mut(seat).draw() {
            Draw::ToHand(_) => {}
            Draw::Burned(card) => script.log(
                LogKind::Action,
                format!("Player {}'s hand is full: {} is discarded", seat.number(), card.name()),
            ),
            Draw::PileEmpty => script.log(LogKind::Action, format!("Player {} has no cards left", seat.number())),
        }
    }
    script.log(LogKind::Action, "Both players draw a card");
    script.sync(state);
    script.pause(400);
}

/// Row by row, each defender's trap springs on the first creature of the
/// attacking side in that row that is about to attack. A ready creature
/// always has a target (the hero at worst), so readiness decides it.
fn trigger_traps(state: &mut GameState, script: &mut Script) {
    for row in 0..ROWS {
        for attacker_seat in Seat::BOTH {
            let defender_seat = attacker_seat.opponent();
            let (attackers, defenders) = state.sides_mut(attacker_seat);
            if defenders.traps[row].is_none() {
                continue;
            }

            let Some(col) = (0..COLS).find(|&col| {
                attackers.field[row][col]
                    .as_ref()
                    .is_some_and(|c| c.can_attack)
            }) else {
                continue;
            };
            let Some(trap) = defenders.traps[row].take() else {
                continue;
            };
            let victim = SlotPos::new(row, col);
            let Some(creature) = attackers.creature_mut(victim) else {
                continue;
            };

            script.log(LogKind::Trap, format!("Trap \"{}\" springs on {}!", trap.name, creature.name));
            script.animate(Animation::TrapTrigger {
                owner: defender_seat,
                row,
                victim,
            });
            match trap.effect {
                TrapEffect::Damage(amount) => {
                    creature.current_hp -= amount;
                    script.animate(Animation::Damage {
                        player: attacker_seat,
                        slot: victim,
                        amount,
                    });
                }
                TrapEffect::Stun => {
                    creature.can_attack = false;
                    creature.stunned = true;
                    script.log(LogKind::Trap, format!("{} is stunned", creature.name));
                }
            }
            let killed = creature.is_dead();
            defenders.graveyard.push(Card::Trap(trap));
            if killed {
                if let Some(dead) = attackers.bury(victim) {
                    script.log(LogKind::Damage, format!("{} is destroyed by a trap", dead.name));
                    script.animate(Animation::Death {
                        player: attacker_seat,
                        slot: victim,
                    });
                }
            }
            script.sync(state);
            script.pause(300);
        }
    }
}

/// Damage owed to a creature or hero once the slot's strikes are all read.
struct Strike {
    seat: Seat,
    from: SlotPos,
    attacker: String,
    damage: i32,
    target: Target,
    /// Retaliation dealt back to the attacker, if any.
    riposte: Option<i32>,
}

/// Whether `defender` strikes back at `attacker`.
///
/// Only a defender that cannot attack this round retaliates, unless it is
/// stunned, and a shooter is only answered by another shooter.
pub fn retaliates(attacker: &Creature, defender: &Creature) -> bool {
    !defender.can_attack && !defender.stunned && (!attacker.shoots() || defender.shoots())
}

fn fight_slot(state: &mut GameState, pos: SlotPos, script: &mut Script) {
    let strikes: Vec<Strike> = Seat::BOTH
        .into_iter()
        .filter_map(|seat| {
            let attacker = state.player(seat).creature(pos).filter(|c| c.can_attack)?;
            let enemy_row = &state.player(seat.opponent()).field[pos.row];
            let target = resolve_target(attacker, enemy_row[FRONT].as_ref(), enemy_row[BACK].as_ref());
            let riposte = match target {
                Target::Creature(col) => enemy_row[col]
                    .as_ref()
                    .filter(|d| retaliates(attacker, d))
                    .map(|d| d.attack),
                Target::Hero => None,
            };
            Some(Strike {
                seat,
                from: pos,
                attacker: attacker.name.clone(),
                damage: attacker.attack,
                target,
                riposte,
            })
        })
        .collect();

    if strikes.is_empty() {
        return;
    }

    for strike in &strikes {
        let defender_seat = strike.seat.opponent();
        script.animate(Animation::Attack {
            player: strike.seat,
            from: strike.from,
            target: strike.target,
            damage: strike.damage,
        });
        let (own, foe) = state.sides_mut(strike.seat);
        match strike.target {
            Target::Hero => {
                foe.hero_hp = (foe.hero_hp - strike.damage).max(0);
                script.log(
                    LogKind::Damage,
                    format!(
                        "{} → hero of player {} (-{})",
                        strike.attacker,
                        defender_seat.number(),
                        strike.damage
                    ),
                );
                script.send(ServerMsg::DirectDamage {
                    defender: defender_seat,
                    damage: strike.damage,
                });
            }
            Target::Creature(col) => {
                let hit = SlotPos::new(strike.from.row, col);
                if let Some(defender) = foe.creature_mut(hit) {
                    defender.current_hp -= strike.damage;
                    script.log(
                        LogKind::Damage,
                        format!("{} → {} (-{})", strike.attacker, defender.name, strike.damage),
                    );
                    script.animate(Animation::Damage {
                        player: defender_seat,
                        slot: hit,
                        amount: strike.damage,
                    });
                    if let (Some(back), Some(attacker)) = (strike.riposte, own.creature_mut(strike.from)) {
                        attacker.current_hp -= back;
                        script.log(LogKind::Damage, format!("{} strikes back (-{back})", defender.name));
                        script.animate(Animation::CounterAttack {
                            player: defender_seat,
                            from: hit,
                            to: strike.from,
                            damage: back,
                        });
                    }
                }
            }
        }
    }

    for seat in Seat::BOTH {
        for cell in SlotPos::all() {
            let player = state.player_mut(seat);
            if player.creature(cell).is_some_and(Creature::is_dead) {
                if let Some(dead) = player.bury(cell) {
                    script.log(LogKind::Damage, format!("{} is destroyed", dead.name));
                    script.animate(Animation::Death { player: seat, slot: cell });
                }
            }
        }
    }

    script.sync(state);
    script.pause(300);
}
