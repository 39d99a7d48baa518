/// Peer module: one client connection, its lifecycle, and its view of the field.

pub mod connection;
pub mod session;
pub mod state;
pub mod transform;
