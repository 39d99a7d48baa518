/// Connection liveness configuration.
/// 
/// A relay session pings its client every `HEARTBEAT_INTERVAL` and drops it
/// once nothing was heard for `CLIENT_TIMEOUT`.
use std::time::Duration;

pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

/// Silence after which a client is considered gone.
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
