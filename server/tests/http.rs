//! HTTP surface: liveness and room lookup.

use actix_web::{http::StatusCode, test, web, App};
use arena_duel_server::{config::RoomSettings, http, lobby::Lobby};
use tokio::sync::mpsc::unbounded_channel;
use uuid::Uuid;

#[actix_rt::test]
async fn healthz_counts_live_rooms() {
    let lobby = Lobby::new(RoomSettings::default());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(lobby.clone()))
            .configure(http::routes::init_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/healthz").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["rooms"], 0);

    let (tx, _rx) = unbounded_channel();
    lobby.create_room(Uuid::new_v4(), tx).await;

    let req = test::TestRequest::get().uri("/api/healthz").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["rooms"], 1);
}

#[actix_rt::test]
async fn room_lookup_reports_the_open_seat() {
    let lobby = Lobby::new(RoomSettings::default());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(lobby.clone()))
            .configure(http::routes::init_routes),
    )
    .await;

    let (tx, _rx) = unbounded_channel();
    let joined = lobby.create_room(Uuid::new_v4(), tx).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/rooms/{}", joined.code.to_lowercase()))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["code"], joined.code.as_str());
    assert_eq!(body["players"], 1);
    assert_eq!(body["openSeat"], true);
}

#[actix_rt::test]
async fn unknown_room_is_not_found() {
    let lobby = Lobby::new(RoomSettings::default());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(lobby))
            .configure(http::routes::init_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/rooms/NOROOM").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "room-not-found");
}
