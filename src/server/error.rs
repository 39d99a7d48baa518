/// Error taxonomy for relay sessions.
///
/// Protocol errors drop the offending message and keep the connection.
/// Connection faults and broken state invariants end the session.
use thiserror::Error;

use crate::server::protocol::codec::CodecError;

/// A client message that could not be understood or may not be sent right now.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("empty message")]
    Empty,
    #[error("unrecognized message kind {0}")]
    UnknownKind(u16),
    #[error("message kind {kind} expects {expected} fields, got {actual}")]
    FieldCount { kind: u16, expected: usize, actual: usize },
    #[error("ball x {x} lies outside the field (width {width})")]
    OutOfField { x: u16, width: u16 },
    #[error("message kind {0} received while not in a game")]
    NotInGame(u16),
    #[error("fragmented frames are not supported")]
    Fragmented,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("connection fault: {0}")]
    Connection(String),
    #[error("state invariant violated: {0}")]
    InvariantViolation(String),
}

impl RelayError {
    /// Whether the session has to be closed.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, RelayError::Protocol(_))
    }
}
