//! WebSocket endpoint: one session per socket, routed through the lobby.

use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_ws::{handle, Message};
use anyhow::Context;
use futures::StreamExt;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::game::session::{Outbox, RoomCmd};
use crate::lobby::{JoinError, Lobby, SessionId};
use crate::protocol::{ClientMsg, ServerMsg};

fn decode(text: &str) -> anyhow::Result<ClientMsg> {
    serde_json::from_str(text).context("malformed client frame")
}

fn join_failed(error: JoinError) -> ServerMsg {
    ServerMsg::JoinFailed {
        error,
        reason: error.to_string(),
    }
}

/// Acts on one decoded client message.
pub async fn route(lobby: &Lobby, session: SessionId, outbox: &Outbox, msg: ClientMsg) {
    match msg {
        ClientMsg::CreateRoom => {
            lobby.create_room(session, outbox.clone()).await;
        }
        ClientMsg::JoinRoom { code } => {
            if let Err(e) = lobby.join_room(session, &code, outbox.clone()).await {
                log::info!("session {session} could not join {code}: {e}");
                let _ = outbox.send(join_failed(e));
            }
        }
        ClientMsg::ResumeRoom { code, token } => {
            if let Err(e) = lobby.resume_room(session, &code, token, outbox.clone()).await {
                log::info!("session {session} could not resume {code}: {e}");
                let _ = outbox.send(join_failed(e));
            }
        }
        ClientMsg::Ready => {
            lobby.forward(session, |seat| RoomCmd::Ready { seat }).await;
        }
        other => {
            if let Some(request) = other.plan() {
                lobby
                    .forward(session, |seat| RoomCmd::Plan { seat, request })
                    .await;
            }
        }
    }
}

pub async fn ws_index(
    req: HttpRequest,
    body: web::Payload,
    lobby: web::Data<Lobby>,
) -> Result<HttpResponse, Error> {
    let (response, mut session, mut ws_stream) = handle(&req, body)?;

    let session_id = Uuid::new_v4();
    let (outbox, mut inbox) = mpsc::unbounded_channel::<ServerMsg>();
    let lobby = lobby.get_ref().clone();
    log::info!("WS opened for session {session_id}");

    actix::spawn(async move {
        loop {
            tokio::select! {
                // client → server
                frame = ws_stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => match decode(&text) {
                        Ok(cmsg) => route(&lobby, session_id, &outbox, cmsg).await,
                        Err(e) => log::warn!("session {session_id}: {e:#}"),
                    },
                    Some(Ok(Message::Ping(bytes))) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                },
                // room → client
                Some(msg) = inbox.recv() => {
                    let json = match serde_json::to_string(&msg) {
                        Ok(json) => json,
                        Err(e) => {
                            log::warn!("could not encode {msg:?}: {e}");
                            continue;
                        }
                    };
                    if let Err(e) = session.text(json).await {
                        log::warn!("WS send failed for {session_id}: {e:?}");
                        break;
                    }
                }
                else => break,
            }
        }

        lobby.disconnect(session_id).await;
        let _ = session.close(None).await;
        log::info!("WS closed for session {session_id}");
    });

    Ok(response)
}
