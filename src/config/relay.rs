/// Wire protocol constants.
/// 
/// Clients and server must agree on these values: they shape the coordinate
/// transform applied to ball updates.
pub const FIELD_WIDTH: u16 = 800; // Playfield width in protocol units.

/// Fixed-point scale applied to the ball direction (radians) on the wire.
pub const DIRECTION_SCALE: f64 = 10_000.0;
