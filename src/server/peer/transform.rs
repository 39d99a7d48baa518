/// Per-player view of the ball.
///
/// The field is stored in player one's frame. Player two sees it mirrored
/// across the vertical axis so both clients draw their own bat on the left.
/// Mirroring is an involution, so the same function maps a view back to the
/// field.
use std::f64::consts::{PI, TAU};

use crate::config::relay::{DIRECTION_SCALE, FIELD_WIDTH};
use crate::server::game_session::game::PlayerSlot;
use crate::server::protocol::messages::BallState;

/// Number of scaled units in a full turn, after rounding.
fn full_turn_units() -> u16 {
    (TAU * DIRECTION_SCALE).round() as u16
}

/// Bring a scaled angle into `[0, 2π)` and round it to a wire value.
fn wrap_direction(scaled: f64) -> u16 {
    let wrapped = scaled.rem_euclid(TAU * DIRECTION_SCALE).round() as u16;
    if wrapped >= full_turn_units() { 0 } else { wrapped }
}

/// Wrap a wire direction into `[0, 2π)`.
pub fn normalize_direction(direction: u16) -> u16 {
    wrap_direction(f64::from(direction))
}

/// Mirror a direction: `π - dir`, wrapped.
pub fn mirror_direction(direction: u16) -> u16 {
    wrap_direction(PI * DIRECTION_SCALE - f64::from(direction))
}

/// Mirror a ball across the field's vertical axis. `x` must not exceed the field width.
pub fn mirror(ball: BallState) -> BallState {
    BallState {
        x: FIELD_WIDTH.saturating_sub(ball.x),
        y: ball.y,
        direction: mirror_direction(ball.direction),
        speed: ball.speed,
    }
}

/// Ball as the given player should see it.
pub fn to_player_view(ball: BallState, slot: PlayerSlot) -> BallState {
    match slot {
        PlayerSlot::One => BallState {
            direction: normalize_direction(ball.direction),
            ..ball
        },
        PlayerSlot::Two => mirror(ball),
    }
}

/// Ball reported by the given player, brought back to the field frame.
pub fn from_player_view(ball: BallState, slot: PlayerSlot) -> BallState {
    to_player_view(ball, slot)
}
