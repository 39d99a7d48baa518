// src/server/mod.rs

//! Server layer root module.
//!
//! This module organizes the relay server components, including:
//! - Application state and HTTP/WebSocket routing
//! - The wire protocol (frame codec, message layouts)
//! - Peer sessions (one per connected client)
//! - Game sessions (relay between the two players of a pairing)
//! - Matchmaking (pending queue, pairing, disconnect cleanup)

pub mod state;
pub mod router;
pub mod status;
pub mod error;
pub mod anti_spam;
pub mod protocol;
pub mod peer;
pub mod game_session;
pub mod matchmaking;
