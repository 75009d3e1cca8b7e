//! Browser LocalStorage backend (wasm32 only)

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{Persistence, StoreError};
use crate::highscores::HighScores;
use crate::settings::Settings;

const SETTINGS_KEY: &str = "ninja_fate_settings";
const SCORES_KEY: &str = "ninja_fate_highscores";

/// Settings and scores as two LocalStorage items
#[derive(Debug, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StoreError::Unavailable("LocalStorage not available".into()))
    }

    fn get<T: DeserializeOwned + Default>(key: &str) -> Result<T, StoreError> {
        let storage = Self::storage()?;
        match storage.get_item(key) {
            Ok(Some(json)) => Ok(serde_json::from_str(&json)?),
            Ok(None) => Ok(T::default()),
            Err(_) => Err(StoreError::Unavailable(format!("cannot read {key}"))),
        }
    }

    fn set<T: Serialize>(key: &str, value: &T) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        let json = serde_json::to_string(value)?;
        storage
            .set_item(key, &json)
            .map_err(|_| StoreError::Unavailable(format!("cannot write {key}")))
    }
}

impl Persistence for LocalStorageStore {
    fn load_settings(&self) -> Result<Settings, StoreError> {
        Self::get(SETTINGS_KEY)
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<(), StoreError> {
        Self::set(SETTINGS_KEY, settings)
    }

    fn load_scores(&self) -> Result<HighScores, StoreError> {
        Self::get(SCORES_KEY)
    }

    fn save_scores(&mut self, scores: &HighScores) -> Result<(), StoreError> {
        Self::set(SCORES_KEY, scores)
    }
}
