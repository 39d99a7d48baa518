/// Everything a relay socket decides, without the socket.
///
/// `Connection` wraps the peer state machine with the per-connection
/// bookkeeping: which frame format the client speaks, the flood guard, and
/// the last time the client was heard from. Each event returns a `Verdict`
/// and queues outbound frames; the WebSocket actor only writes the queued
/// frames and carries out the verdict.
use std::time::Instant;

use log::{debug, error, warn};

use crate::config::heartbeat::CLIENT_TIMEOUT;
use crate::server::anti_spam::FloodGuard;
use crate::server::error::{ProtocolError, RelayError};
use crate::server::game_session::game::{Game, GameId, PeerLink, PlayerSlot, RelayEvent};
use crate::server::matchmaking::types::PeerId;
use crate::server::peer::state::PeerState;
use crate::server::protocol::codec::{self, Frame, WireFormat};
use crate::server::protocol::messages::{ClientMessage, ServerMessage};

/// A frame received from the client.
#[derive(Debug, Clone, Copy)]
pub enum InboundFrame<'a> {
    Text(&'a str),
    Binary(&'a [u8]),
    /// A continuation of a fragmented message.
    Fragment,
}

/// How the connection has to be closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Closing {
    /// Client misbehaved: close with a policy code.
    Policy(&'static str),
    /// The transport is gone: stop without a close frame.
    Fault,
    /// Server-side inconsistency: close with an error code.
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Close(Closing),
}

pub struct Connection<P> {
    peer_id: PeerId,
    state: PeerState<P>,
    wire: WireFormat,
    flood: FloodGuard,
    last_heartbeat: Instant,
    outbox: Vec<Frame>,
}

impl<P: PeerLink> Connection<P> {
    pub fn new(peer_id: PeerId, now: Instant) -> Self {
        Self {
            peer_id,
            state: PeerState::new(peer_id),
            wire: WireFormat::default(),
            flood: FloodGuard::starting_at(now),
            last_heartbeat: now,
            outbox: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &PeerState<P> {
        &self.state
    }

    #[cfg(test)]
    pub fn wire(&self) -> WireFormat {
        self.wire
    }

    /// Frames queued for the client since the last call.
    pub fn take_outbox(&mut self) -> Vec<Frame> {
        std::mem::take(&mut self.outbox)
    }

    /// Queue the waiting status sent right after the upgrade.
    pub fn on_connect(&mut self) {
        let msg = self.state.on_connect();
        self.push(msg);
    }

    /// Handle one frame from the client.
    pub fn on_frame(&mut self, frame: InboundFrame<'_>, now: Instant) -> Verdict {
        self.last_heartbeat = now;
        if self.flood.record_frame(&self.peer_id, now) {
            return Verdict::Close(Closing::Policy("Flooding"));
        }

        let decoded = match frame {
            InboundFrame::Text(text) => {
                self.wire = WireFormat::Text;
                codec::decode_text(text).map_err(ProtocolError::from)
            }
            InboundFrame::Binary(bytes) => {
                self.wire = WireFormat::Binary;
                codec::decode_binary(bytes).map_err(ProtocolError::from)
            }
            InboundFrame::Fragment => Err(ProtocolError::Fragmented),
        };

        let result = decoded
            .inspect(|values| debug!("[PeerSession] {} -> {:?}", self.peer_id, values))
            .and_then(|values| ClientMessage::parse(&values))
            .map_err(RelayError::from)
            .and_then(|msg| self.state.dispatch(msg));

        match result {
            Ok(()) => Verdict::Keep,
            Err(err) => self.on_error(err),
        }
    }

    /// Apply the error policy: recoverable errors drop the message, the rest close.
    pub fn on_error(&mut self, err: RelayError) -> Verdict {
        if !err.is_fatal() {
            warn!("[PeerSession] {} dropped message: {}", self.peer_id, err);
            if self.flood.record_protocol_error(&self.peer_id) {
                return Verdict::Close(Closing::Policy("Too many invalid messages"));
            }
            return Verdict::Keep;
        }
        match err {
            RelayError::Connection(reason) => {
                warn!("[PeerSession] {} connection fault: {}", self.peer_id, reason);
                Verdict::Close(Closing::Fault)
            }
            other => {
                error!("[PeerSession] {} {}; closing session", self.peer_id, other);
                Verdict::Close(Closing::Internal)
            }
        }
    }

    /// The client answered a ping or pinged us.
    pub fn heartbeat(&mut self, now: Instant) {
        self.last_heartbeat = now;
    }

    /// Called on every heartbeat tick; closes once the client went silent.
    pub fn check_heartbeat(&mut self, now: Instant) -> Verdict {
        if now.duration_since(self.last_heartbeat) > CLIENT_TIMEOUT {
            return self.on_error(RelayError::Connection(format!(
                "no heartbeat for {:?}",
                CLIENT_TIMEOUT
            )));
        }
        Verdict::Keep
    }

    pub fn attach(&mut self, game: Game<P>, slot: PlayerSlot) -> Verdict {
        match self.state.attach(game, slot) {
            Ok(ready) => {
                self.push(ready);
                Verdict::Keep
            }
            Err(err) => self.on_error(err),
        }
    }

    pub fn opponent_left(&mut self, game_id: GameId) {
        if let Some(not_ready) = self.state.opponent_left(game_id) {
            self.push(not_ready);
        }
    }

    pub fn relay(&mut self, game_id: GameId, event: RelayEvent) {
        if let Some(out) = self.state.outbound(game_id, event) {
            self.push(out);
        }
    }

    pub fn close(&mut self) {
        self.state.close();
    }

    /// Encode a message in the client's current format and queue it.
    fn push(&mut self, msg: ServerMessage) {
        let values = msg.to_values();
        match self.wire.encode(&values) {
            Ok(frame) => {
                debug!("[PeerSession] {} <- {:?}", self.peer_id, values);
                self.outbox.push(frame);
            }
            Err(e) => warn!("[PeerSession] {} dropped outbound {:?}: {}", self.peer_id, values, e),
        }
    }
}
