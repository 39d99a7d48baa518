//! Registry counters over HTTP.

use actix_web::{error, web, Error, HttpResponse};

use crate::server::matchmaking::server::GetStats;
use crate::server::state::AppState;

/// `GET /status`: number of clients, pending peers and active games, as JSON.
pub async fn relay_status(data: web::Data<AppState>) -> Result<HttpResponse, Error> {
    let stats = data
        .matchmaker
        .send(GetStats)
        .await
        .map_err(error::ErrorInternalServerError)?;
    Ok(HttpResponse::Ok().json(stats))
}
