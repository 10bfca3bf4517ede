//! Wire shapes the browser client relies on.

use arena_duel_server::{
    game::{
        actions::PlanRequest,
        targeting::Target,
        types::{Phase, Seat, SlotPos},
    },
    lobby::JoinError,
    protocol::{Animation, ClientMsg, ServerMsg},
};
use serde_json::json;

#[test]
fn client_frames_decode_into_plan_requests() {
    let place: ClientMsg =
        serde_json::from_value(json!({"type": "placeCard", "handIndex": 2, "row": 3, "col": 1})).unwrap();
    assert_eq!(
        place.plan(),
        Some(PlanRequest::Place {
            hand_index: 2,
            slot: SlotPos::new(3, 1)
        })
    );

    let step: ClientMsg = serde_json::from_value(json!({
        "type": "moveCard", "fromRow": 0, "fromCol": 1, "toRow": 1, "toCol": 1
    }))
    .unwrap();
    assert_eq!(
        step.plan(),
        Some(PlanRequest::Move {
            from: SlotPos::new(0, 1),
            to: SlotPos::new(1, 1)
        })
    );

    let spell: ClientMsg = serde_json::from_value(json!({
        "type": "castSpell", "handIndex": 0, "targetPlayer": 2, "row": 1, "col": 0
    }))
    .unwrap();
    assert_eq!(
        spell.plan(),
        Some(PlanRequest::Spell {
            hand_index: 0,
            target: 2,
            slot: SlotPos::new(1, 0)
        })
    );

    let trap: ClientMsg = serde_json::from_value(json!({"type": "placeTrap", "handIndex": 4, "trapRow": 3})).unwrap();
    assert_eq!(trap.plan(), Some(PlanRequest::Trap { hand_index: 4, row: 3 }));

    let ready: ClientMsg = serde_json::from_value(json!({"type": "ready"})).unwrap();
    assert_eq!(ready, ClientMsg::Ready);
    assert_eq!(ready.plan(), None);
}

#[test]
fn unknown_frames_are_rejected() {
    assert!(serde_json::from_value::<ClientMsg>(json!({"type": "surrender"})).is_err());
    assert!(serde_json::from_value::<ClientMsg>(json!({"type": "placeCard", "handIndex": 1})).is_err());
}

#[test]
fn server_messages_use_numeric_seats_and_kebab_phases() {
    let over = serde_json::to_value(ServerMsg::GameOver { winner: Some(Seat::Two) }).unwrap();
    assert_eq!(over, json!({"type": "gameOver", "winner": 2}));

    let draw = serde_json::to_value(ServerMsg::GameOver { winner: None }).unwrap();
    assert_eq!(draw, json!({"type": "gameOver", "winner": null}));

    let phase = serde_json::to_value(ServerMsg::PhaseChange { phase: Phase::GameOver }).unwrap();
    assert_eq!(phase, json!({"type": "phaseChange", "phase": "game-over"}));

    let hit = serde_json::to_value(ServerMsg::DirectDamage {
        defender: Seat::One,
        damage: 3,
    })
    .unwrap();
    assert_eq!(hit, json!({"type": "directDamage", "defender": 1, "damage": 3}));

    let turn = serde_json::to_value(ServerMsg::NewTurn { turn: 4, max_energy: 4 }).unwrap();
    assert_eq!(turn, json!({"type": "newTurn", "turn": 4, "maxEnergy": 4}));
}

#[test]
fn animations_are_tagged_by_kind() {
    let attack = serde_json::to_value(ServerMsg::Animation {
        event: Animation::Attack {
            player: Seat::One,
            from: SlotPos::new(2, 1),
            target: Target::Hero,
            damage: 5,
        },
    })
    .unwrap();
    assert_eq!(attack["type"], "animation");
    assert_eq!(attack["event"]["kind"], "attack");
    assert_eq!(attack["event"]["from"], json!({"row": 2, "col": 1}));
    assert_eq!(attack["event"]["target"], json!({"kind": "hero"}));

    let counter = serde_json::to_value(Animation::CounterAttack {
        player: Seat::Two,
        from: SlotPos::new(0, 1),
        to: SlotPos::new(0, 1),
        damage: 1,
    })
    .unwrap();
    assert_eq!(counter["kind"], "counter-attack");

    let missed = serde_json::to_value(Animation::SpellMissed {
        caster: Seat::One,
        target_player: Seat::Two,
        slot: SlotPos::new(1, 1),
    })
    .unwrap();
    assert_eq!(missed["kind"], "spell-missed");
    assert_eq!(missed["targetPlayer"], 2);
}

#[test]
fn join_failures_carry_a_machine_code_and_a_reason() {
    let msg = ServerMsg::JoinFailed {
        error: JoinError::RoomFull,
        reason: JoinError::RoomFull.to_string(),
    };
    assert_eq!(
        serde_json::to_value(msg).unwrap(),
        json!({"type": "joinFailed", "error": "room-full", "reason": "room is full"})
    );
}
