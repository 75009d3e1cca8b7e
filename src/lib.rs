//! Ninja Fate - A top-down arcade survival game
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (perception, enemy AI, combat, waves)
//! - `session`: Game lifecycle around the simulation (restart, score saving)
//! - `platform`: Fixed-step frame clock
//! - `persistence`: Settings and leaderboard storage behind a gateway
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
    pub const WALL_THICKNESS: f32 = 32.0;

    /// Sprite sheets have nine frames per animation
    pub const ANIM_FRAMES: u32 = 9;

    /// Player start position (arena center)
    pub const PLAYER_START: (f32, f32) = (400.0, 300.0);

    /// Enemies alive when a run begins
    pub const INITIAL_CHASERS: usize = 3;

    /// Longest accepted player name
    pub const MAX_NAME_LEN: usize = 16;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector for a heading angle (radians, screen space with y down)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Heading angle of a vector; zero vectors map to 0
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}
