/// Main configuration module.
/// 
/// Re-exports submodules for the wire protocol, connection liveness,
/// flood protection and the HTTP bind address.
pub mod relay;
pub mod heartbeat;
pub mod anti_spam;
pub mod server;
