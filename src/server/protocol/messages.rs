use crate::config::relay::FIELD_WIDTH;
use crate::server::error::ProtocolError;

pub const KIND_READY: u16 = 101;
pub const KIND_NOT_READY: u16 = 102;
/// Forfeit from a client, win notice from the server.
pub const KIND_FORFEIT: u16 = 103;
pub const KIND_BAT: u16 = 201;
pub const KIND_BALL: u16 = 202;

/// Ball state as carried on the wire. `direction` is radians scaled by
/// `DIRECTION_SCALE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BallState {
    pub x: u16,
    pub y: u16,
    pub direction: u16,
    pub speed: u16,
}

// Message client -> serveur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMessage {
    Forfeit,
    Bat { y: u16 },
    Ball(BallState),
}

impl ClientMessage {
    /// Parse a decoded frame. Field counts are exact for every kind.
    pub fn parse(values: &[u16]) -> Result<Self, ProtocolError> {
        let (&kind, fields) = values.split_first().ok_or(ProtocolError::Empty)?;
        match kind {
            KIND_FORFEIT => {
                expect_fields(kind, fields, 0)?;
                Ok(ClientMessage::Forfeit)
            }
            KIND_BAT => {
                expect_fields(kind, fields, 1)?;
                Ok(ClientMessage::Bat { y: fields[0] })
            }
            KIND_BALL => {
                expect_fields(kind, fields, 4)?;
                let ball = BallState {
                    x: fields[0],
                    y: fields[1],
                    direction: fields[2],
                    speed: fields[3],
                };
                if ball.x > FIELD_WIDTH {
                    return Err(ProtocolError::OutOfField { x: ball.x, width: FIELD_WIDTH });
                }
                Ok(ClientMessage::Ball(ball))
            }
            other => Err(ProtocolError::UnknownKind(other)),
        }
    }

    pub fn kind(&self) -> u16 {
        match self {
            ClientMessage::Forfeit => KIND_FORFEIT,
            ClientMessage::Bat { .. } => KIND_BAT,
            ClientMessage::Ball(_) => KIND_BALL,
        }
    }
}

fn expect_fields(kind: u16, fields: &[u16], expected: usize) -> Result<(), ProtocolError> {
    if fields.len() != expected {
        return Err(ProtocolError::FieldCount {
            kind,
            expected,
            actual: fields.len(),
        });
    }
    Ok(())
}

// Message serveur -> client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerMessage {
    Ready,
    NotReady,
    Victory,
    OpponentBat { y: u16 },
    Ball(BallState),
}

impl ServerMessage {
    pub fn to_values(&self) -> Vec<u16> {
        match *self {
            ServerMessage::Ready => vec![KIND_READY],
            ServerMessage::NotReady => vec![KIND_NOT_READY],
            ServerMessage::Victory => vec![KIND_FORFEIT],
            ServerMessage::OpponentBat { y } => vec![KIND_BAT, y],
            ServerMessage::Ball(ball) => vec![KIND_BALL, ball.x, ball.y, ball.direction, ball.speed],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_kinds() {
        assert_eq!(ClientMessage::parse(&[103]), Ok(ClientMessage::Forfeit));
        assert_eq!(ClientMessage::parse(&[201, 300]), Ok(ClientMessage::Bat { y: 300 }));
        assert_eq!(
            ClientMessage::parse(&[202, 100, 50, 0, 5]),
            Ok(ClientMessage::Ball(BallState { x: 100, y: 50, direction: 0, speed: 5 }))
        );
    }

    #[test]
    fn test_parse_rejects_unknown_and_server_only_kinds() {
        assert_eq!(ClientMessage::parse(&[999]), Err(ProtocolError::UnknownKind(999)));
        assert_eq!(ClientMessage::parse(&[101]), Err(ProtocolError::UnknownKind(101)));
        assert_eq!(ClientMessage::parse(&[]), Err(ProtocolError::Empty));
    }

    #[test]
    fn test_parse_checks_field_count() {
        assert_eq!(
            ClientMessage::parse(&[201]),
            Err(ProtocolError::FieldCount { kind: 201, expected: 1, actual: 0 })
        );
        assert_eq!(
            ClientMessage::parse(&[202, 1, 2, 3, 4, 5]),
            Err(ProtocolError::FieldCount { kind: 202, expected: 4, actual: 5 })
        );
        assert!(ClientMessage::parse(&[103, 1]).is_err());
    }

    #[test]
    fn test_parse_rejects_ball_outside_field() {
        assert_eq!(
            ClientMessage::parse(&[202, 801, 0, 0, 0]),
            Err(ProtocolError::OutOfField { x: 801, width: FIELD_WIDTH })
        );
        assert!(ClientMessage::parse(&[202, FIELD_WIDTH, 0, 0, 0]).is_ok());
    }

    #[test]
    fn test_server_message_layouts() {
        assert_eq!(ServerMessage::Ready.to_values(), vec![101]);
        assert_eq!(ServerMessage::NotReady.to_values(), vec![102]);
        assert_eq!(ServerMessage::Victory.to_values(), vec![103]);
        assert_eq!(ServerMessage::OpponentBat { y: 300 }.to_values(), vec![201, 300]);
        let ball = BallState { x: 700, y: 50, direction: 31416, speed: 5 };
        assert_eq!(ServerMessage::Ball(ball).to_values(), vec![202, 700, 50, 31416, 5]);
    }
}
