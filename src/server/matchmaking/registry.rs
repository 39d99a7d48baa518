/// Session registry.
///
/// Holds every connected peer, the FIFO of peers waiting for an opponent and
/// the active games. Pairing and disconnect cleanup happen here; the
/// matchmaking actor is the only owner, so no two operations ever interleave.
use std::collections::{HashMap, VecDeque};

use log::{debug, error, info, warn};
use uuid::Uuid;

use super::types::{PeerId, RelayStats, Seat};
use crate::server::game_session::game::{Game, GameId, GamePlayer, PeerLink, PlayerSlot};

/// A connected peer and, when playing, its seat.
struct ClientEntry<P> {
    link: P,
    seat: Option<Seat>,
}

pub struct Registry<P> {
    clients: HashMap<PeerId, ClientEntry<P>>,
    pending: VecDeque<PeerId>,
    games: HashMap<GameId, Game<P>>,
}

impl<P> Default for Registry<P> {
    fn default() -> Self {
        Self {
            clients: HashMap::new(),
            pending: VecDeque::new(),
            games: HashMap::new(),
        }
    }
}

impl<P: PeerLink> Registry<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly connected peer and queue it for a game.
    pub fn connect(&mut self, peer_id: PeerId, link: P) -> Option<GameId> {
        if self.clients.contains_key(&peer_id) {
            warn!("[Matchmaking] Peer {} connected twice, ignoring", peer_id);
            return None;
        }
        self.clients.insert(peer_id, ClientEntry { link, seat: None });
        info!("[Matchmaking] Peer {} connected ({} clients)", peer_id, self.clients.len());
        self.enqueue_pending(peer_id)
    }

    /// Append a peer to the pending queue, and pair the queue as soon as it
    /// holds two peers. Returns the id of the game created, if any.
    pub fn enqueue_pending(&mut self, peer_id: PeerId) -> Option<GameId> {
        let Some(entry) = self.clients.get(&peer_id) else {
            debug!("[Matchmaking] Peer {} is gone, not queueing", peer_id);
            return None;
        };
        if let Some(seat) = entry.seat {
            error!(
                "[Matchmaking] Peer {} queued while seated in game {}",
                peer_id, seat.game_id
            );
            return None;
        }
        if self.pending.contains(&peer_id) {
            debug!("[Matchmaking] Peer {} already pending", peer_id);
            return None;
        }
        self.pending.push_back(peer_id);
        debug!("[Matchmaking] Peer {} pending ({} waiting)", peer_id, self.pending.len());

        if self.pending.len() >= 2 {
            return self.pair_front();
        }
        None
    }

    /// Seat the two oldest pending peers in a new game.
    fn pair_front(&mut self) -> Option<GameId> {
        if self.pending.len() < 2 {
            return None;
        }
        let (Some(first), Some(second)) = (self.pending.pop_front(), self.pending.pop_front()) else {
            return None;
        };
        let (link_one, link_two) = match (self.clients.get(&first), self.clients.get(&second)) {
            (Some(one), Some(two)) => (one.link.clone(), two.link.clone()),
            _ => {
                error!("[Matchmaking] Pending peers {} / {} missing from client set", first, second);
                for id in [second, first] {
                    if self.clients.contains_key(&id) {
                        self.pending.push_front(id);
                    }
                }
                return None;
            }
        };

        let game_id = Uuid::new_v4();
        let game = Game::new(
            game_id,
            GamePlayer { peer_id: first, link: link_one },
            GamePlayer { peer_id: second, link: link_two },
        );

        for (peer_id, slot) in [(first, PlayerSlot::One), (second, PlayerSlot::Two)] {
            if let Some(entry) = self.clients.get_mut(&peer_id) {
                entry.seat = Some(Seat { game_id, slot });
            }
        }
        self.games.insert(game_id, game.clone());

        for slot in [PlayerSlot::One, PlayerSlot::Two] {
            game.player(slot).link.attach(game.clone(), slot);
        }

        info!(
            "[Matchmaking] Game {} created: player 1 = {}, player 2 = {}",
            game_id, first, second
        );
        Some(game_id)
    }

    /// Forget a disconnected peer. Its game, if any, is dissolved and the
    /// opponent goes back to the pending queue. Calling this twice for the
    /// same peer is a no-op the second time.
    pub fn disconnect(&mut self, peer_id: PeerId) -> bool {
        self.pending.retain(|id| *id != peer_id);

        let Some(entry) = self.clients.remove(&peer_id) else {
            debug!("[Matchmaking] Peer {} already removed", peer_id);
            return false;
        };
        info!("[Matchmaking] Peer {} disconnected ({} clients)", peer_id, self.clients.len());

        let Some(seat) = entry.seat else {
            return true;
        };
        let Some(game) = self.games.remove(&seat.game_id) else {
            error!(
                "[Matchmaking] Peer {} was seated in unknown game {}",
                peer_id, seat.game_id
            );
            return true;
        };

        let sibling_id = game.sibling(seat.slot).peer_id;
        if let Some(sibling) = self.clients.get_mut(&sibling_id) {
            sibling.seat = None;
            sibling.link.opponent_left(game.id());
            info!(
                "[Matchmaking] Game {} dissolved, requeueing peer {}",
                game.id(),
                sibling_id
            );
            self.enqueue_pending(sibling_id);
        } else {
            info!("[Matchmaking] Game {} dissolved, both players gone", game.id());
        }
        true
    }

    pub fn stats(&self) -> RelayStats {
        RelayStats {
            clients: self.clients.len(),
            pending: self.pending.len(),
            games: self.games.len(),
        }
    }

    #[cfg(test)]
    pub fn is_connected(&self, peer_id: &PeerId) -> bool {
        self.clients.contains_key(peer_id)
    }

    #[cfg(test)]
    pub fn is_pending(&self, peer_id: &PeerId) -> bool {
        self.pending.contains(peer_id)
    }

    #[cfg(test)]
    pub fn pending(&self) -> impl Iterator<Item = &PeerId> {
        self.pending.iter()
    }

    pub fn seat(&self, peer_id: &PeerId) -> Option<Seat> {
        self.clients.get(peer_id).and_then(|entry| entry.seat)
    }

    #[cfg(test)]
    pub fn game(&self, game_id: &GameId) -> Option<&Game<P>> {
        self.games.get(game_id)
    }

    /// Check the registry's invariants, describing the first one broken.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.pending.len() > 1 {
            return Err(format!("{} peers left pending", self.pending.len()));
        }
        for id in &self.pending {
            match self.clients.get(id) {
                None => return Err(format!("pending peer {} is not connected", id)),
                Some(entry) if entry.seat.is_some() => {
                    return Err(format!("pending peer {} is seated", id));
                }
                Some(_) => {}
            }
        }
        for (game_id, game) in &self.games {
            let one = game.player(PlayerSlot::One).peer_id;
            let two = game.player(PlayerSlot::Two).peer_id;
            if one == two {
                return Err(format!("game {} pairs peer {} with itself", game_id, one));
            }
            for slot in [PlayerSlot::One, PlayerSlot::Two] {
                let peer_id = game.player(slot).peer_id;
                let expected = Some(Seat { game_id: *game_id, slot });
                if self.seat(&peer_id) != expected {
                    return Err(format!("peer {} does not point back to game {}", peer_id, game_id));
                }
            }
        }
        for (peer_id, entry) in &self.clients {
            if let Some(seat) = entry.seat {
                if !self.games.contains_key(&seat.game_id) {
                    return Err(format!("peer {} seated in missing game {}", peer_id, seat.game_id));
                }
            }
        }
        Ok(())
    }
}
