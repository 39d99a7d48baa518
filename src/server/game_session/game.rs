/// One active pairing of two peers.
///
/// A game is a pure relay: whatever one player reports is forwarded to the
/// other one, nothing is simulated or stored. The registry owns the game and
/// each attached peer keeps a copy of it to reach its sibling.
use std::fmt;

use log::debug;
use uuid::Uuid;

use crate::server::matchmaking::types::PeerId;
use crate::server::protocol::messages::BallState;

pub type GameId = Uuid;

/// Seat of a peer inside a game. Player one is the first to have queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub fn number(self) -> u8 {
        match self {
            PlayerSlot::One => 1,
            PlayerSlot::Two => 2,
        }
    }

    pub fn other(self) -> Self {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }

    fn index(self) -> usize {
        usize::from(self.number() - 1)
    }
}

/// Event relayed from one player to the other. Ball states are in field frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayEvent {
    Victory,
    Bat { y: u16 },
    Ball(BallState),
}

/// Outbound side of a peer, as seen by the registry and by games.
///
/// Every call is fire-and-forget.
pub trait PeerLink: Clone + Send + Unpin + 'static {
    /// The peer has been seated in `game`.
    fn attach(&self, game: Game<Self>, slot: PlayerSlot);
    /// The other player of `game` has left.
    fn opponent_left(&self, game_id: GameId);
    /// An event forwarded by the sibling through `game_id`.
    fn relay(&self, game_id: GameId, event: RelayEvent);
}

#[derive(Clone)]
pub struct GamePlayer<P> {
    pub peer_id: PeerId,
    pub link: P,
}

#[derive(Clone)]
pub struct Game<P> {
    id: GameId,
    players: [GamePlayer<P>; 2],
}

impl<P> fmt::Debug for Game<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("id", &self.id)
            .field("player_one", &self.players[0].peer_id)
            .field("player_two", &self.players[1].peer_id)
            .finish()
    }
}

impl<P: PeerLink> Game<P> {
    pub fn new(id: GameId, player_one: GamePlayer<P>, player_two: GamePlayer<P>) -> Self {
        Self {
            id,
            players: [player_one, player_two],
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn player(&self, slot: PlayerSlot) -> &GamePlayer<P> {
        &self.players[slot.index()]
    }

    pub fn sibling(&self, slot: PlayerSlot) -> &GamePlayer<P> {
        self.player(slot.other())
    }

    /// Slot held by `peer_id`, if it plays in this game.
    #[cfg(test)]
    pub fn slot_of(&self, peer_id: &PeerId) -> Option<PlayerSlot> {
        [PlayerSlot::One, PlayerSlot::Two]
            .into_iter()
            .find(|slot| &self.player(*slot).peer_id == peer_id)
    }

    /// The loser's sibling is told it won.
    pub fn report_loss(&self, loser: PlayerSlot) {
        self.forward(loser, RelayEvent::Victory);
    }

    pub fn relay_bat(&self, from: PlayerSlot, y: u16) {
        self.forward(from, RelayEvent::Bat { y });
    }

    /// `ball` must already be in field frame.
    pub fn relay_ball(&self, from: PlayerSlot, ball: BallState) {
        self.forward(from, RelayEvent::Ball(ball));
    }

    fn forward(&self, from: PlayerSlot, event: RelayEvent) {
        let to = self.sibling(from);
        debug!(
            "[Game] {} player {} -> player {}: {:?}",
            self.id,
            from.number(),
            from.other().number(),
            event
        );
        to.link.relay(self.id, event);
    }
}
