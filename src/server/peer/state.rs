/// Lifecycle of one connected client.
///
/// `Pending` (waiting for an opponent) -> `Attached` (seated in a game) ->
/// `Closed`. An attached peer goes back to `Pending` when its opponent
/// leaves. The socket actor drives this machine and writes whatever
/// `ServerMessage` it hands back.
use log::{debug, info};

use crate::server::error::{ProtocolError, RelayError};
use crate::server::game_session::game::{Game, GameId, PeerLink, PlayerSlot, RelayEvent};
use crate::server::matchmaking::types::PeerId;
use crate::server::peer::transform::{from_player_view, to_player_view};
use crate::server::protocol::messages::{ClientMessage, ServerMessage};

/// Coarse state, for logs and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerStatus {
    Pending,
    Attached,
    Closed,
}

enum Phase<P> {
    Pending,
    Attached { game: Game<P>, slot: PlayerSlot },
    Closed,
}

pub struct PeerState<P> {
    peer_id: PeerId,
    phase: Phase<P>,
}

impl<P: PeerLink> PeerState<P> {
    pub fn new(peer_id: PeerId) -> Self {
        Self {
            peer_id,
            phase: Phase::Pending,
        }
    }

    /// Status message sent as soon as the connection is up.
    pub fn on_connect(&self) -> ServerMessage {
        ServerMessage::NotReady
    }

    pub fn status(&self) -> PeerStatus {
        match self.phase {
            Phase::Pending => PeerStatus::Pending,
            Phase::Attached { .. } => PeerStatus::Attached,
            Phase::Closed => PeerStatus::Closed,
        }
    }

    #[cfg(test)]
    pub fn slot(&self) -> Option<PlayerSlot> {
        match &self.phase {
            Phase::Attached { slot, .. } => Some(*slot),
            _ => None,
        }
    }

    pub fn game_id(&self) -> Option<GameId> {
        match &self.phase {
            Phase::Attached { game, .. } => Some(game.id()),
            _ => None,
        }
    }

    /// Seat the peer in `game`. Only valid while pending.
    pub fn attach(&mut self, game: Game<P>, slot: PlayerSlot) -> Result<ServerMessage, RelayError> {
        if !matches!(self.phase, Phase::Pending) {
            return Err(RelayError::InvariantViolation(format!(
                "peer {} attached to game {} while {:?}",
                self.peer_id,
                game.id(),
                self.status()
            )));
        }
        if game.player(slot).peer_id != self.peer_id {
            return Err(RelayError::InvariantViolation(format!(
                "peer {} attached to slot {} of game {} held by {}",
                self.peer_id,
                slot.number(),
                game.id(),
                game.player(slot).peer_id
            )));
        }
        info!(
            "[PeerSession] {} attached to game {} as player {}",
            self.peer_id,
            game.id(),
            slot.number()
        );
        self.phase = Phase::Attached { game, slot };
        Ok(ServerMessage::Ready)
    }

    /// The opponent of `game_id` has left. Returns the status message to send,
    /// or `None` when the notice is about a game this peer is no longer in.
    pub fn opponent_left(&mut self, game_id: GameId) -> Option<ServerMessage> {
        if self.game_id() != Some(game_id) {
            debug!(
                "[PeerSession] {} ignored departure notice for game {}",
                self.peer_id, game_id
            );
            return None;
        }
        self.phase = Phase::Pending;
        info!(
            "[PeerSession] {} lost its opponent in game {}, back to pending",
            self.peer_id, game_id
        );
        Some(ServerMessage::NotReady)
    }

    pub fn close(&mut self) {
        if !matches!(self.phase, Phase::Closed) {
            info!("[PeerSession] {} closed (was {:?})", self.peer_id, self.status());
        }
        self.phase = Phase::Closed;
    }

    /// Handle a message from this peer's client.
    pub fn dispatch(&self, msg: ClientMessage) -> Result<(), RelayError> {
        let Phase::Attached { game, slot } = &self.phase else {
            return Err(ProtocolError::NotInGame(msg.kind()).into());
        };
        match msg {
            ClientMessage::Forfeit => {
                info!(
                    "[PeerSession] {} (player {}) forfeits game {}",
                    self.peer_id,
                    slot.number(),
                    game.id()
                );
                game.report_loss(*slot);
            }
            ClientMessage::Bat { y } => game.relay_bat(*slot, y),
            ClientMessage::Ball(ball) => game.relay_ball(*slot, from_player_view(ball, *slot)),
        }
        Ok(())
    }

    /// Turn an event relayed through `game_id` into the message for this
    /// peer's client. Events from a previous game are dropped.
    pub fn outbound(&self, game_id: GameId, event: RelayEvent) -> Option<ServerMessage> {
        let Phase::Attached { game, slot } = &self.phase else {
            debug!("[PeerSession] {} dropped relay while {:?}", self.peer_id, self.status());
            return None;
        };
        if game.id() != game_id {
            debug!(
                "[PeerSession] {} dropped stale relay from game {}",
                self.peer_id, game_id
            );
            return None;
        }
        Some(match event {
            RelayEvent::Victory => ServerMessage::Victory,
            RelayEvent::Bat { y } => ServerMessage::OpponentBat { y },
            RelayEvent::Ball(ball) => ServerMessage::Ball(to_player_view(ball, *slot)),
        })
    }
}
