//! One async task per live room.
//! ✔ planning countdown, forced resolution on expiry
//! ✔ paced resolution playback without blocking the task
//! ✔ grace window after a disconnect, then teardown

use std::collections::VecDeque;

use tokio::{
    sync::mpsc,
    time::{sleep_until, Instant},
};

use crate::{
    config::RoomSettings,
    game::{
        actions::{self, PlanRequest},
        logic::{self, Beat, Outcome},
        phase::{self, Countdown},
        snapshot::player_view,
        state::GameState,
        types::{Phase, Seat},
    },
    lobby::Lobby,
    protocol::ServerMsg,
};

/// Outbound queue of one connected player.
pub type Outbox = mpsc::UnboundedSender<ServerMsg>;

/// Commands a room task accepts.
#[derive(Debug)]
pub enum RoomCmd {
    Attach { seat: Seat, outbox: Outbox },
    Detach { seat: Seat },
    Plan { seat: Seat, request: PlanRequest },
    Ready { seat: Seat },
}

#[derive(Debug, Default)]
struct SeatLink {
    outbox: Option<Outbox>,
    /// Set while the seat is vacated: when the grace window runs out.
    expires_at: Option<Instant>,
}

struct Room {
    code: String,
    settings: RoomSettings,
    game: GameState,
    seats: [SeatLink; 2],
    started: bool,
    countdown: Option<Countdown>,
    playback: VecDeque<Beat>,
    /// Next playback step, while resolution is being played out.
    resume_at: Option<Instant>,
    outcome: Option<Outcome>,
}

/// Spawns the task for room `code` and returns its command channel.
pub fn spawn(code: String, settings: RoomSettings, lobby: Lobby) -> mpsc::Sender<RoomCmd> {
    let (tx, rx) = mpsc::channel::<RoomCmd>(64);
    let game = GameState::random(&mut rand::rng(), settings.turn_time);
    tokio::spawn(run(Room::new(code, settings, game), rx, lobby));
    tx
}

async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

async fn run(mut room: Room, mut rx: mpsc::Receiver<RoomCmd>, lobby: Lobby) {
    log::info!("Room {} opened", room.code);

    loop {
        let tick = room.countdown.as_ref().map(Countdown::deadline);
        let step = room.resume_at;
        let grace = room.seats.iter().filter_map(|s| s.expires_at).min();

        tokio::select! {
            cmd = rx.recv() => match cmd {
                Some(cmd) => room.handle(cmd),
                None => break,
            },
            _ = until(tick) => room.on_tick(),
            _ = until(step) => room.play(),
            _ = until(grace) => {
                log::info!("Room {}: grace window lapsed, closing", room.code);
                break;
            }
        }
    }

    lobby.release(&room.code);
    log::info!("Room {} closed", room.code);
}

impl Room {
    fn new(code: String, settings: RoomSettings, game: GameState) -> Self {
        Room {
            code,
            settings,
            game,
            seats: Default::default(),
            started: false,
            countdown: None,
            playback: VecDeque::new(),
            resume_at: None,
            outcome: None,
        }
    }

    fn send_to(&self, seat: Seat, msg: ServerMsg) {
        if let Some(outbox) = &self.seats[seat.index()].outbox {
            let _ = outbox.send(msg);
        }
    }

    fn broadcast(&self, msg: ServerMsg) {
        for seat in Seat::BOTH {
            self.send_to(seat, msg.clone());
        }
    }

    fn sync(&self, seat: Seat) {
        self.send_to(
            seat,
            ServerMsg::GameStateUpdate {
                state: player_view(&self.game, seat),
            },
        );
    }

    fn handle(&mut self, cmd: RoomCmd) {
        match cmd {
            RoomCmd::Attach { seat, outbox } => {
                let link = &mut self.seats[seat.index()];
                link.outbox = Some(outbox);
                link.expires_at = None;

                if self.started {
                    log::info!("Room {}: player {} reconnected", self.code, seat.number());
                    self.send_to(
                        seat,
                        ServerMsg::GameStart {
                            state: player_view(&self.game, seat),
                        },
                    );
                    self.send_to(seat.opponent(), ServerMsg::PlayerReconnected { player: seat });
                } else if self.seats.iter().all(|s| s.outbox.is_some()) {
                    self.start();
                }
            }
            RoomCmd::Detach { seat } => {
                let link = &mut self.seats[seat.index()];
                link.outbox = None;
                link.expires_at = Some(Instant::now() + self.settings.disconnect_grace);
                log::info!("Room {}: player {} disconnected", self.code, seat.number());
                self.broadcast(ServerMsg::PlayerDisconnected { player: seat });
            }
            RoomCmd::Plan { seat, request } => {
                if !self.started {
                    return;
                }
                match actions::submit(&mut self.game, seat, request.clone()) {
                    Ok(kind) => {
                        log::debug!("Room {}: player {} queued {kind:?}", self.code, seat.number());
                        self.sync(seat);
                    }
                    Err(why) => {
                        log::debug!(
                            "Room {}: dropped {request:?} from player {}: {why}",
                            self.code,
                            seat.number()
                        );
                    }
                }
            }
            RoomCmd::Ready { seat } => {
                if !self.started || !phase::mark_ready(&mut self.game, seat) {
                    return;
                }
                self.broadcast(ServerMsg::PlayerReady { player: seat });
                if self.game.both_ready() {
                    self.begin_resolution();
                }
            }
        }
    }

    fn start(&mut self) {
        self.started = true;
        log::info!("Room {} started", self.code);
        for seat in Seat::BOTH {
            self.send_to(
                seat,
                ServerMsg::GameStart {
                    state: player_view(&self.game, seat),
                },
            );
        }
        self.start_countdown();
    }

    fn start_countdown(&mut self) {
        self.game.time_left = self.settings.turn_time;
        self.countdown = Some(Countdown::start(self.settings.turn_time));
    }

    fn on_tick(&mut self) {
        let Some(countdown) = self.countdown.as_mut() else {
            return;
        };
        let left = countdown.tick();
        self.game.time_left = left;
        self.broadcast(ServerMsg::TimerUpdate { seconds: left });
        if left == 0 {
            phase::force_ready(&mut self.game);
            self.begin_resolution();
        }
    }

    fn begin_resolution(&mut self) {
        self.countdown = None;
        if !phase::enter_resolution(&mut self.game) {
            return;
        }
        self.broadcast(ServerMsg::PhaseChange {
            phase: Phase::Resolution,
        });

        let resolution = logic::resolve_round(&mut self.game);
        self.playback = resolution.beats.into();
        self.outcome = Some(resolution.outcome);
        self.resume_at = Some(Instant::now());
    }

    /// Plays beats until the next non-zero pause, or to the end.
    fn play(&mut self) {
        self.resume_at = None;
        while let Some(beat) = self.playback.pop_front() {
            match beat {
                Beat::Broadcast(msg) => self.broadcast(msg),
                Beat::Direct(seat, msg) => self.send_to(seat, msg),
                Beat::Pause(ms) => {
                    let delay = self.settings.pace(ms);
                    if !delay.is_zero() {
                        self.resume_at = Some(Instant::now() + delay);
                        return;
                    }
                }
            }
        }
        self.finish_resolution();
    }

    fn finish_resolution(&mut self) {
        match self.outcome.take() {
            Some(Outcome::NextRound) => {
                phase::advance_round(&mut self.game, self.settings.turn_time);
                self.broadcast(ServerMsg::NewTurn {
                    turn: self.game.round,
                    max_energy: self.game.player(Seat::One).max_energy,
                });
                self.broadcast(ServerMsg::PhaseChange {
                    phase: Phase::Planning,
                });
                for seat in Seat::BOTH {
                    self.sync(seat);
                }
                self.start_countdown();
            }
            Some(Outcome::GameOver { winner }) => {
                log::info!("Room {} finished, winner {winner:?}", self.code);
            }
            None => {}
        }
    }
}
