//! Settings and leaderboard persistence
//!
//! Backends implement [`Persistence`] and report failures as [`StoreError`].
//! The game only talks to a [`Gateway`], which caches everything in memory
//! and turns storage failures into logged no-ops.

pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

use thiserror::Error;

use crate::highscores::{HighScoreEntry, HighScores};
use crate::settings::{Settings, clamp_volume};

pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// Storage failure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("unsupported store version {0}")]
    UnsupportedVersion(u32),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A place settings and scores can be kept
pub trait Persistence {
    fn load_settings(&self) -> Result<Settings, StoreError>;
    fn save_settings(&mut self, settings: &Settings) -> Result<(), StoreError>;
    fn load_scores(&self) -> Result<HighScores, StoreError>;
    fn save_scores(&mut self, scores: &HighScores) -> Result<(), StoreError>;
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub settings: Settings,
    pub scores: HighScores,
}

impl Persistence for MemoryStore {
    fn load_settings(&self) -> Result<Settings, StoreError> {
        Ok(self.settings.clone())
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<(), StoreError> {
        self.settings = settings.clone();
        Ok(())
    }

    fn load_scores(&self) -> Result<HighScores, StoreError> {
        Ok(self.scores.clone())
    }

    fn save_scores(&mut self, scores: &HighScores) -> Result<(), StoreError> {
        self.scores = scores.clone();
        Ok(())
    }
}

/// Cached, failure-tolerant front for a [`Persistence`] backend
#[derive(Debug)]
pub struct Gateway<P: Persistence> {
    store: P,
    settings: Settings,
    scores: HighScores,
}

impl<P: Persistence> Gateway<P> {
    /// Load settings and scores, falling back to defaults on failure
    pub fn new(store: P) -> Self {
        let settings = match store.load_settings() {
            Ok(s) => {
                log::info!("Loaded settings");
                s.sanitized()
            }
            Err(e) => {
                log::warn!("Using default settings: {e}");
                Settings::default()
            }
        };
        let scores = match store.load_scores() {
            Ok(s) => {
                let s = s.normalize();
                log::info!("Loaded {} high scores", s.len());
                s
            }
            Err(e) => {
                log::warn!("Starting with an empty leaderboard: {e}");
                HighScores::new()
            }
        };
        Self {
            store,
            settings,
            scores,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn volume(&self) -> f32 {
        self.settings.master_volume
    }

    /// Set the master volume (clamped to [0, 1]) and persist it
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        self.update_settings(|s| s.master_volume = clamp_volume(volume));
        self.settings.master_volume
    }

    pub fn volume_up(&mut self) -> f32 {
        self.update_settings(|s| {
            s.volume_up();
        });
        self.settings.master_volume
    }

    pub fn volume_down(&mut self) -> f32 {
        self.update_settings(|s| {
            s.volume_down();
        });
        self.settings.master_volume
    }

    /// Change settings in memory, then try to persist them
    pub fn update_settings(&mut self, f: impl FnOnce(&mut Settings)) {
        f(&mut self.settings);
        if let Err(e) = self.store.save_settings(&self.settings) {
            log::warn!("Settings not saved: {e}");
        }
    }

    /// Best `limit` entries, highest first
    pub fn top_scores(&self, limit: usize) -> &[HighScoreEntry] {
        self.scores.top(limit)
    }

    /// Record a finished run and persist the table. Returns the rank if the
    /// run made the table.
    pub fn record_score(&mut self, name: &str, score: u64) -> Option<usize> {
        let rank = self.scores.record(name, score)?;
        log::info!("Recorded score {score} for {name:?} at rank {rank}");
        if let Err(e) = self.store.save_scores(&self.scores) {
            log::warn!("High scores not saved: {e}");
        }
        Some(rank)
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn into_store(self) -> P {
        self.store
    }
}
