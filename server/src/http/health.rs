//! Simple liveness probe

use actix_web::{get, web, HttpResponse, Responder};

use crate::lobby::Lobby;

#[get("/healthz")]
pub async fn healthz(lobby: web::Data<Lobby>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "rooms": lobby.room_count(),
    }))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(healthz);
}
