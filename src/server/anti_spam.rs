use std::time::{Instant, Duration};
use log::warn;

use crate::config::anti_spam::{MAX_FRAMES_PER_SECOND, MAX_PROTOCOL_ERRORS};
use crate::server::matchmaking::types::PeerId;

/// Tracks inbound traffic for a single relay session.
pub struct FloodGuard {
    // Timestamp of last reset (for per-second counters)
    last_tick: Instant,
    // Number of frames received in the current second
    frames_this_tick: u32,
    // Messages dropped for protocol errors since the connection opened
    protocol_errors: u32,
}

impl FloodGuard {
    pub fn starting_at(now: Instant) -> Self {
        Self {
            last_tick: now,
            frames_this_tick: 0,
            protocol_errors: 0,
        }
    }

    /// Call for every incoming frame.
    /// Returns true if the session is flooding and must be closed.
    pub fn record_frame(&mut self, peer_id: &PeerId, now: Instant) -> bool {
        self.tick(now);
        self.frames_this_tick += 1;
        if self.frames_this_tick > MAX_FRAMES_PER_SECOND {
            warn!("[AntiSpam] Peer {} exceeded {} frames per second", peer_id, MAX_FRAMES_PER_SECOND);
            return true;
        }
        false
    }

    /// Call when a message was dropped for a protocol error.
    /// Returns true once the peer has sent too many bad messages.
    pub fn record_protocol_error(&mut self, peer_id: &PeerId) -> bool {
        self.protocol_errors += 1;
        if self.protocol_errors > MAX_PROTOCOL_ERRORS {
            warn!("[AntiSpam] Peer {} sent {} invalid messages", peer_id, self.protocol_errors);
            return true;
        }
        false
    }

    /// Reset per-second counters if a new second has started.
    fn tick(&mut self, now: Instant) {
        if now.duration_since(self.last_tick) >= Duration::from_secs(1) {
            self.last_tick = now;
            self.frames_this_tick = 0;
        }
    }
}
