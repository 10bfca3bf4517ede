use actix_web::{middleware::Logger, web, App, HttpServer};
use arena_duel_server::{
    config::{settings, RoomSettings},
    http,
    lobby::Lobby,
    metrics, ws,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cfg = settings();
    let lobby = Lobby::new(RoomSettings::from(cfg));
    log::info!(
        "Listening on {} (turn {}s, grace {}s)",
        cfg.server_addr,
        cfg.turn_time,
        cfg.disconnect_grace
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(metrics::METRICS.clone())
            .app_data(web::Data::new(lobby.clone()))
            .configure(http::routes::init_routes)
            .configure(ws::routes::init_routes)
    })
    .bind(&cfg.server_addr)?
    .run()
    .await
}
