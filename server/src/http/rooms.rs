//! Room lookup for the join screen.

use actix_web::{get, web, HttpResponse, Responder};

use crate::lobby::{JoinError, Lobby};

/// GET /api/rooms/{code}
#[get("/rooms/{code}")]
pub async fn status(path: web::Path<String>, lobby: web::Data<Lobby>) -> impl Responder {
    match lobby.status(&path.into_inner()) {
        Some(room) => HttpResponse::Ok().json(room),
        None => HttpResponse::NotFound().json(serde_json::json!({
            "error": JoinError::RoomNotFound,
            "reason": JoinError::RoomNotFound.to_string(),
        })),
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(status);
}
