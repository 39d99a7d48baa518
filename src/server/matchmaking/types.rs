use serde::Serialize;
use uuid::Uuid;

use crate::server::game_session::game::{GameId, PlayerSlot};

/// Opaque handle of one connection.
pub type PeerId = Uuid;

/// Where an attached peer sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Seat {
    pub game_id: GameId,
    pub slot: PlayerSlot,
}

#[derive(Clone, Copy, Serialize, Debug, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub clients: usize, // connexions ouvertes
    pub pending: usize, // joueurs en attente d'un adversaire
    pub games: usize,
}
