//! Game settings and preferences

use serde::{Deserialize, Serialize};

use crate::highscores::sanitize_name;

/// Volume adjustment step
pub const VOLUME_STEP: f32 = 0.05;

/// Clamp to [0, 1] and round to two decimals; garbage becomes full volume
pub fn clamp_volume(volume: f32) -> f32 {
    if !volume.is_finite() {
        return 1.0;
    }
    (volume.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Draw enemy vision cones
    pub show_vision_cones: bool,
    /// Name used for the last run
    pub player_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            show_vision_cones: false,
            player_name: String::new(),
        }
    }
}

impl Settings {
    /// Repair values loaded from storage
    pub fn sanitized(mut self) -> Self {
        self.master_volume = clamp_volume(self.master_volume);
        self.player_name = sanitize_name(&self.player_name).unwrap_or_default();
        self
    }

    pub fn volume_up(&mut self) -> f32 {
        self.master_volume = clamp_volume(self.master_volume + VOLUME_STEP);
        self.master_volume
    }

    pub fn volume_down(&mut self) -> f32 {
        self.master_volume = clamp_volume(self.master_volume - VOLUME_STEP);
        self.master_volume
    }
}
