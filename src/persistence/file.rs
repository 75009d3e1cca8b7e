//! JSON file backend
//!
//! One versioned document holds settings and the score table. A missing
//! file is an empty store; a file that cannot be read or parsed, or has an
//! unknown version, is logged and treated as empty. Writes go to a temp file
//! that is then renamed over the document.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{Persistence, StoreError};
use crate::highscores::HighScores;
use crate::settings::Settings;

/// Current document version
pub const STORE_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreDocument {
    version: u32,
    #[serde(default)]
    settings: Settings,
    #[serde(default)]
    scores: HighScores,
}

/// Settings and scores in a single JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    document: StoreDocument,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let document = match read_document(&path) {
            Ok(Some(doc)) => doc,
            Ok(None) => StoreDocument::default(),
            Err(e) => {
                log::warn!("Ignoring store {}: {e}", path.display());
                StoreDocument::default()
            }
        };
        Self { path, document }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&mut self) -> Result<(), StoreError> {
        self.document.version = STORE_VERSION;
        let io_err = |source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = serde_json::to_string_pretty(&self.document)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

/// Read a store document; `Ok(None)` when the file does not exist
fn read_document(path: &Path) -> Result<Option<StoreDocument>, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.display().to_string(),
                source,
            });
        }
    };
    let doc: StoreDocument = serde_json::from_str(&text)?;
    if doc.version != STORE_VERSION {
        return Err(StoreError::UnsupportedVersion(doc.version));
    }
    Ok(Some(doc))
}

impl Persistence for JsonFileStore {
    fn load_settings(&self) -> Result<Settings, StoreError> {
        Ok(self.document.settings.clone())
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<(), StoreError> {
        self.document.settings = settings.clone();
        self.write()
    }

    fn load_scores(&self) -> Result<HighScores, StoreError> {
        Ok(self.document.scores.clone())
    }

    fn save_scores(&mut self, scores: &HighScores) -> Result<(), StoreError> {
        self.document.scores = scores.clone();
        self.write()
    }
}
