/// Matchmaking server actor.
///
/// Owns the session registry. Connections, disconnections and stats queries
/// arrive as messages and are handled one at a time, so the pending queue,
/// client set and game set are never mutated concurrently.
use actix::prelude::*;
use log::{debug, error};

use super::registry::Registry;
use super::types::{PeerId, RelayStats};
use crate::server::game_session::game::PeerLink;

/// Main matchmaking server actor.
pub struct Matchmaker<P> {
    registry: Registry<P>,
}

impl<P: PeerLink> Matchmaker<P> {
    /// Create a new matchmaking server with an empty registry.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }
}

impl<P: PeerLink> Default for Matchmaker<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PeerLink> Actor for Matchmaker<P> {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        debug!("[Matchmaking] Matchmaker started");
    }
}

/// Message: a new connection is ready to be paired.
pub struct Connect<P> {
    pub peer_id: PeerId,
    pub link: P,
}

impl<P: PeerLink> Message for Connect<P> {
    type Result = ();
}

/// Message: a connection has closed.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub peer_id: PeerId,
}

/// Message: snapshot of the registry counters.
#[derive(Message)]
#[rtype(result = "RelayStats")]
pub struct GetStats;

impl<P: PeerLink> Handler<Connect<P>> for Matchmaker<P> {
    type Result = ();

    /// Registers the peer and pairs it if someone is already waiting.
    fn handle(&mut self, msg: Connect<P>, _ctx: &mut Self::Context) -> Self::Result {
        self.registry.connect(msg.peer_id, msg.link);
    }
}

impl<P: PeerLink> Handler<Disconnect> for Matchmaker<P> {
    type Result = ();

    /// Removes the peer, dissolving its game and requeueing the opponent.
    fn handle(&mut self, msg: Disconnect, _ctx: &mut Self::Context) -> Self::Result {
        self.registry.disconnect(msg.peer_id);
        if let Err(violation) = self.registry.check_invariants() {
            error!("[Matchmaking] Registry inconsistent after disconnect: {}", violation);
        }
    }
}

impl<P: PeerLink> Handler<GetStats> for Matchmaker<P> {
    type Result = MessageResult<GetStats>;

    fn handle(&mut self, _msg: GetStats, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.registry.stats())
    }
}
