//! JSON preference store.
//!
//! Preferences are free-form strings appended to a single document:
//! `{ "preferences": ["...", ...] }`. Reads never fail; a missing or
//! malformed document reads as an empty list.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferenceDocument {
    #[serde(default)]
    preferences: Vec<String>,
}

/// File-backed list of user preferences.
pub struct PreferenceStore {
    path: PathBuf,
    /// Serialises read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory and an empty document if missing.
    pub async fn ensure_exists(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        if tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(());
        }

        let _guard = self.write_lock.lock().await;
        self.write_document(&PreferenceDocument::default()).await?;
        info!(path = %self.path.display(), "Created preference store");
        Ok(())
    }

    /// Append a preference and return how many are stored.
    pub async fn save(&self, preference: &str) -> Result<usize> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.read_document().await;
        document.preferences.push(preference.to_string());
        self.write_document(&document).await?;

        debug!(total = document.preferences.len(), "Saved preference");
        Ok(document.preferences.len())
    }

    /// All stored preferences, oldest first.
    pub async fn load(&self) -> Vec<String> {
        self.read_document().await.preferences
    }

    async fn read_document(&self) -> PreferenceDocument {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "No preference document");
                return PreferenceDocument::default();
            }
        };

        serde_json::from_str(&data).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Malformed preference document, treating as empty");
            PreferenceDocument::default()
        })
    }

    async fn write_document(&self, document: &PreferenceDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp_path = self.path.with_extension("tmp");
        let data = serde_json::to_string_pretty(document)?;
        tokio::fs::write(&tmp_path, data).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}
