//! Room task behaviour driven through the lobby, on a paused clock.

use arena_duel_server::{
    config::RoomSettings,
    game::{
        session::RoomCmd,
        types::{Phase, Seat},
    },
    lobby::{room_code, JoinError, Joined, Lobby, SessionId},
    protocol::ServerMsg,
};
use rand::{rngs::StdRng, SeedableRng};
use tokio::{
    sync::mpsc::{unbounded_channel, UnboundedReceiver},
    time::{sleep, timeout, Duration},
};
use uuid::Uuid;

struct Client {
    session: SessionId,
    rx: UnboundedReceiver<ServerMsg>,
    joined: Joined,
}

fn settings(turn_time: u32) -> RoomSettings {
    RoomSettings {
        turn_time,
        disconnect_grace: Duration::from_secs(10),
        resolution_pace: 0,
    }
}

/// Waits for the first message matching `pred`, skipping the rest.
async fn expect<F>(rx: &mut UnboundedReceiver<ServerMsg>, what: &str, pred: F) -> ServerMsg
where
    F: Fn(&ServerMsg) -> bool,
{
    let wait = async {
        while let Some(msg) = rx.recv().await {
            if pred(&msg) {
                return Some(msg);
            }
        }
        None
    };
    match timeout(Duration::from_secs(600), wait).await {
        Ok(Some(msg)) => msg,
        _ => panic!("never saw {what}"),
    }
}

async fn host(lobby: &Lobby) -> Client {
    let session = Uuid::new_v4();
    let (tx, rx) = unbounded_channel();
    let joined = lobby.create_room(session, tx).await;
    Client { session, rx, joined }
}

async fn guest(lobby: &Lobby, code: &str) -> Client {
    let session = Uuid::new_v4();
    let (tx, rx) = unbounded_channel();
    let joined = lobby.join_room(session, code, tx).await.expect("seat two is free");
    Client { session, rx, joined }
}

async fn seated_pair(lobby: &Lobby) -> (Client, Client) {
    let one = host(lobby).await;
    let two = guest(lobby, &one.joined.code).await;
    (one, two)
}

#[tokio::test(start_paused = true)]
async fn game_starts_once_both_seats_fill() {
    let lobby = Lobby::new(settings(90));
    let mut one = host(&lobby).await;
    assert_eq!(one.joined.seat, Seat::One);
    assert_eq!(one.joined.code.len(), 6);

    match one.rx.recv().await {
        Some(ServerMsg::RoomCreated { code, player_num, token }) => {
            assert_eq!(code, one.joined.code);
            assert_eq!(player_num, Seat::One);
            assert_eq!(token, one.joined.token);
        }
        other => panic!("expected roomCreated, got {other:?}"),
    }

    // Codes are matched case-insensitively.
    let mut two = guest(&lobby, &format!(" {} ", one.joined.code.to_lowercase())).await;
    assert_eq!(two.joined.seat, Seat::Two);
    assert!(matches!(
        two.rx.recv().await,
        Some(ServerMsg::RoomJoined { player_num: Seat::Two, .. })
    ));

    for (client, seat) in [(&mut one, Seat::One), (&mut two, Seat::Two)] {
        let ServerMsg::GameStart { state } =
            expect(&mut client.rx, "gameStart", |m| matches!(m, ServerMsg::GameStart { .. })).await
        else {
            unreachable!()
        };
        assert_eq!(state.my_player, seat);
        assert_eq!(state.turn, 1);
        assert_eq!(state.phase, Phase::Planning);
        assert_eq!(state.me.hand.len(), 7);
        assert_eq!(state.opponent.hand_count, 7);
        assert_eq!(state.me.hp, 20);
    }

    let status = lobby.status(&one.joined.code).expect("room is listed");
    assert_eq!(status.players, 2);
    assert!(!status.open_seat);
}

#[tokio::test(start_paused = true)]
async fn both_ready_starts_the_next_round() {
    let lobby = Lobby::new(settings(90));
    let (mut one, mut two) = seated_pair(&lobby).await;

    assert!(lobby.forward(one.session, |seat| RoomCmd::Ready { seat }).await);
    // A second ready is ignored.
    assert!(lobby.forward(one.session, |seat| RoomCmd::Ready { seat }).await);
    expect(&mut two.rx, "playerReady", |m| {
        matches!(m, ServerMsg::PlayerReady { player: Seat::One })
    })
    .await;

    assert!(lobby.forward(two.session, |seat| RoomCmd::Ready { seat }).await);

    for client in [&mut one, &mut two] {
        expect(&mut client.rx, "resolution", |m| {
            matches!(m, ServerMsg::PhaseChange { phase: Phase::Resolution })
        })
        .await;
        expect(&mut client.rx, "newTurn", |m| {
            matches!(m, ServerMsg::NewTurn { turn: 2, max_energy: 2 })
        })
        .await;
        expect(&mut client.rx, "planning", |m| {
            matches!(m, ServerMsg::PhaseChange { phase: Phase::Planning })
        })
        .await;
        let ServerMsg::GameStateUpdate { state } =
            expect(&mut client.rx, "sync", |m| matches!(m, ServerMsg::GameStateUpdate { .. })).await
        else {
            unreachable!()
        };
        assert_eq!(state.turn, 2);
        assert_eq!(state.me.energy, 2);
        assert!(!state.me.ready);
    }
}

#[tokio::test(start_paused = true)]
async fn countdown_expiry_forces_resolution() {
    let lobby = Lobby::new(settings(3));
    let (mut one, _two) = seated_pair(&lobby).await;

    for left in [2, 1, 0] {
        expect(&mut one.rx, "timerUpdate", |m| {
            matches!(m, ServerMsg::TimerUpdate { seconds } if *seconds == left)
        })
        .await;
    }
    expect(&mut one.rx, "resolution", |m| {
        matches!(m, ServerMsg::PhaseChange { phase: Phase::Resolution })
    })
    .await;
    expect(&mut one.rx, "newTurn", |m| matches!(m, ServerMsg::NewTurn { turn: 2, .. })).await;

    // The next countdown starts from the full turn time again.
    expect(&mut one.rx, "fresh timer", |m| {
        matches!(m, ServerMsg::TimerUpdate { seconds: 2 })
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn joining_needs_a_live_room_with_a_free_seat() {
    let lobby = Lobby::new(settings(90));
    let (one, _two) = seated_pair(&lobby).await;

    let (tx, _rx) = unbounded_channel();
    let missing = lobby.join_room(Uuid::new_v4(), "ZZZZZZ", tx.clone()).await;
    assert_eq!(missing, Err(JoinError::RoomNotFound));

    let full = lobby.join_room(Uuid::new_v4(), &one.joined.code, tx).await;
    assert_eq!(full, Err(JoinError::RoomFull));

    assert!(lobby.status("ZZZZZZ").is_none());
    assert!(!lobby.forward(Uuid::new_v4(), |seat| RoomCmd::Ready { seat }).await);
}

#[tokio::test(start_paused = true)]
async fn abandoned_room_closes_after_the_grace_window() {
    let lobby = Lobby::new(settings(90));
    let (mut one, two) = seated_pair(&lobby).await;
    assert_eq!(lobby.room_count(), 1);

    lobby.disconnect(two.session).await;
    expect(&mut one.rx, "playerDisconnected", |m| {
        matches!(m, ServerMsg::PlayerDisconnected { player: Seat::Two })
    })
    .await;
    assert!(lobby.binding(two.session).is_none());

    sleep(Duration::from_secs(11)).await;

    assert_eq!(lobby.room_count(), 0);
    assert!(lobby.binding(one.session).is_none());
}

#[tokio::test(start_paused = true)]
async fn dropped_player_can_resume_with_their_token() {
    let lobby = Lobby::new(settings(90));
    let (mut one, two) = seated_pair(&lobby).await;
    let code = two.joined.code.clone();

    lobby.disconnect(two.session).await;

    let (tx, mut rx) = unbounded_channel();
    let stranger = lobby.resume_room(Uuid::new_v4(), &code, Uuid::new_v4(), tx.clone()).await;
    assert_eq!(stranger, Err(JoinError::SeatUnavailable));
    // Seat one is still connected, so its token cannot be reused.
    let hijack = lobby.resume_room(Uuid::new_v4(), &code, one.joined.token, tx.clone()).await;
    assert_eq!(hijack, Err(JoinError::SeatUnavailable));

    let session = Uuid::new_v4();
    let back = lobby
        .resume_room(session, &code, two.joined.token, tx)
        .await
        .expect("token matches the vacated seat");
    assert_eq!(back.seat, Seat::Two);

    expect(&mut rx, "roomJoined", |m| matches!(m, ServerMsg::RoomJoined { player_num: Seat::Two, .. })).await;
    let ServerMsg::GameStart { state } =
        expect(&mut rx, "gameStart", |m| matches!(m, ServerMsg::GameStart { .. })).await
    else {
        unreachable!()
    };
    assert_eq!(state.my_player, Seat::Two);
    expect(&mut one.rx, "playerReconnected", |m| {
        matches!(m, ServerMsg::PlayerReconnected { player: Seat::Two })
    })
    .await;

    sleep(Duration::from_secs(11)).await;
    assert_eq!(lobby.room_count(), 1);
    assert_eq!(lobby.binding(session).map(|b| b.seat), Some(Seat::Two));
}

#[test]
fn room_codes_are_six_base36_characters() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let code = room_code(&mut rng);
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }
}
