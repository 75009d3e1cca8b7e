//! Demo autopilot for headless runs
//!
//! Aims at the nearest enemy, keeps it at sword length, swings when it is in
//! reach and throws when it is far away.

use glam::Vec2;

use super::state::GameState;
use super::tick::TickInput;

/// Engage distance band (center to center)
const TOO_CLOSE: f32 = 50.0;
const TOO_FAR: f32 = 65.0;
/// Swing when the target is this close
const SWING_RANGE: f32 = 75.0;
/// Throw when the target is farther than this
const THROW_RANGE: f32 = 120.0;

/// Build this frame's input from the current state
pub fn drive(state: &GameState) -> TickInput {
    let player = state.player.pos;
    let nearest = state
        .actors
        .iter()
        .map(|a| (a.pos, a.pos.distance(player)))
        .min_by(|a, b| a.1.total_cmp(&b.1));

    let Some((target, dist)) = nearest else {
        // Nothing to fight: drift back to the middle
        let center = Vec2::new(state.arena.width / 2.0, state.arena.height / 2.0);
        return TickInput {
            move_axis: (center - player).normalize_or_zero(),
            aim: center,
            ..Default::default()
        };
    };

    let toward = (target - player).normalize_or_zero();
    let move_axis = if dist > TOO_FAR {
        toward
    } else if dist < TOO_CLOSE {
        -toward
    } else {
        Vec2::ZERO
    };

    TickInput {
        move_axis,
        aim: target,
        melee: dist < SWING_RANGE,
        fire: dist > THROW_RANGE,
        pause: false,
    }
}
