//! Main entry point for the relay server.
//!
//! Initializes logging and the actor system, starts the matchmaker, and
//! launches the HTTP server with the relay WebSocket endpoint.

use actix::Actor;
use actix_web::{web, App, HttpServer};
use log::info;

use config::server::ServerConfig;
use server::peer::session::RelayMatchmaker;

pub mod config;
mod server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger from environment variable (default to info level).
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let bind = ServerConfig::from_env();

    // Start the matchmaker actor (pending queue, games, disconnect cleanup).
    let matchmaker = RelayMatchmaker::new().start();

    // Shared application state for HTTP/WebSocket handlers.
    let state = web::Data::new(server::state::AppState::new(matchmaker));

    info!("[Relay] Listening on {}:{}", bind.host, bind.port);

    HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Headers", "*"))
            )
            .app_data(state.clone())
            .configure(crate::server::router::config)
    })
    .bind((bind.host.as_str(), bind.port))?
    .run()
    .await
}
