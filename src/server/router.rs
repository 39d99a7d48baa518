//! HTTP and WebSocket routing configuration.
//!
//! `/ws` upgrades to a relay session, `/status` reports registry counters.

use actix_web::web;
use crate::server::peer::session::ws_relay;
use crate::server::status::relay_status;

/// Configure the application's HTTP/WebSocket routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/ws")
            .to(ws_relay)
    )
    .service(
        web::resource("/status")
            .route(web::get().to(relay_status))
    );
}
