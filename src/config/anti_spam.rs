/// Configuration for flood protection on relay sockets.
/// Values are counts per second or totals per connection.
pub const MAX_FRAMES_PER_SECOND: u32 = 240;
pub const MAX_PROTOCOL_ERRORS: u32 = 20;
