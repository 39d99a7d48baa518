// src/server/state.rs

//! Application state for the relay server.
//!
//! Holds the matchmaker actor address shared by every HTTP/WebSocket handler.

use actix::Addr;
use crate::server::peer::session::RelayMatchmaker;

/// Shared application state, injected into HTTP/WebSocket handlers.
pub struct AppState {
    /// Address of the matchmaking actor (pending queue, games, cleanup).
    pub matchmaker: Addr<RelayMatchmaker>,
}

impl AppState {
    /// Create a new AppState with the given actor address.
    pub fn new(matchmaker: Addr<RelayMatchmaker>) -> Self {
        AppState { matchmaker }
    }
}
