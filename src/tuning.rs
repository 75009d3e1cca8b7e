//! Data-driven game balance
//!
//! Every field has a default, so a tuning file only needs the values it
//! overrides. Speeds are in units per second.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to load a tuning file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read tuning file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed tuning file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value: {0}")]
    Invalid(&'static str),
}

/// Gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub player_speed: f32,
    pub player_radius: f32,
    /// Extra distance kept from the arena edge beyond the player radius
    pub player_edge_margin: f32,
    pub fire_cooldown: f32,

    // === Katana ===
    pub katana_reach: f32,
    pub katana_hit_size: f32,
    /// Sweep speed in degrees per second
    pub katana_sweep_speed: f32,
    /// Sweep limit either side of the aim direction (degrees)
    pub katana_sweep_limit: f32,

    // === Projectiles ===
    pub projectile_speed: f32,
    pub projectile_size: f32,

    // === Enemies ===
    pub enemy_size: f32,
    pub enemy_speed_min: f32,
    pub enemy_speed_max: f32,
    /// Full field of view (degrees)
    pub enemy_fov: f32,
    pub enemy_vision_radius: f32,
    pub arrive_distance: f32,
    pub search_time: f32,
    pub response_delay_max: f32,
    pub chase_multiplier: f32,
    pub stuck_distance: f32,
    pub stuck_time: f32,
    pub blocked_nudge: f32,
    pub shooter_fire_interval: f32,

    // === Alert ===
    pub alert_expiry: f32,

    // === Waves ===
    pub chaser_spawn_distance: f32,
    pub shooter_spawn_distance: f32,
    pub max_chasers_per_wave: u32,
    pub max_shooters_per_wave: u32,
    pub shooter_first_wave: u32,
    pub music_level_two_wave: u32,

    // === Scoring ===
    pub chaser_points: u64,
    pub shooter_points: u64,
    pub stealth_multiplier: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 300.0,
            player_radius: 12.0,
            player_edge_margin: 34.0,
            fire_cooldown: 0.5,

            katana_reach: 35.0,
            katana_hit_size: 20.0,
            katana_sweep_speed: 1800.0,
            katana_sweep_limit: 60.0,

            projectile_speed: 600.0,
            projectile_size: 16.0,

            enemy_size: 50.0,
            enemy_speed_min: 108.0,
            enemy_speed_max: 144.0,
            enemy_fov: 90.0,
            enemy_vision_radius: 200.0,
            arrive_distance: 12.0,
            search_time: 2.0,
            response_delay_max: 1.5,
            chase_multiplier: 1.1,
            stuck_distance: 1.0,
            stuck_time: 0.5,
            blocked_nudge: 20.0,
            shooter_fire_interval: 0.5,

            alert_expiry: 6.0,

            chaser_spawn_distance: 200.0,
            shooter_spawn_distance: 250.0,
            max_chasers_per_wave: 10,
            max_shooters_per_wave: 5,
            shooter_first_wave: 3,
            music_level_two_wave: 7,

            chaser_points: 10,
            shooter_points: 25,
            stealth_multiplier: 2,
        }
    }
}

impl Tuning {
    /// Parse a tuning document; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning file from disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_json_str(&text)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Load a tuning file, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(tuning) => tuning,
            Err(error) => {
                log::warn!("{error}; using default tuning");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.enemy_speed_min <= 0.0 || self.enemy_speed_max < self.enemy_speed_min {
            return Err(ConfigError::Invalid("enemy speed range"));
        }
        if !(0.0..=360.0).contains(&self.enemy_fov) {
            return Err(ConfigError::Invalid("enemy_fov must be within 0..=360"));
        }
        if self.response_delay_max.is_nan() || self.response_delay_max < 0.0 {
            return Err(ConfigError::Invalid("response_delay_max must not be negative"));
        }
        if self.alert_expiry <= 0.0 {
            return Err(ConfigError::Invalid("alert_expiry must be positive"));
        }
        if self.katana_sweep_limit <= 0.0 || self.katana_sweep_speed <= 0.0 {
            return Err(ConfigError::Invalid("katana sweep"));
        }
        Ok(())
    }

    /// Speed an enemy uses while chasing a visible player
    pub fn chase_speed(&self, base_speed: f32) -> f32 {
        base_speed.max(self.player_speed * self.chase_multiplier)
    }

    /// Points for a kill, doubled for stealth kills
    pub fn kill_points(&self, base: u64, stealth: bool) -> u64 {
        if stealth {
            base * self.stealth_multiplier
        } else {
            base
        }
    }
}
