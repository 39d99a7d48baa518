/// Matchmaking module: pending queue, pairing, and disconnect cleanup.

pub mod registry;
pub mod server;
pub mod types;
