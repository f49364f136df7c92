//! Data file locations.
//!
//! Everything Wayfarer persists lives in one data directory (`data/` by
//! default).

use std::path::{Path, PathBuf};

/// Serialised flat vector index.
pub const KB_INDEX_FILE: &str = "knowledge_base.index.json";

/// JSON array of chunk texts, positionally aligned with the index.
pub const KB_TEXTS_FILE: &str = "knowledge_base_texts.json";

/// `{ "preferences": [...] }` document.
pub const PREFERENCES_FILE: &str = "user_prefs.json";

/// Path of the knowledge base index inside `data_dir`.
pub fn kb_index_file(data_dir: &Path) -> PathBuf {
    data_dir.join(KB_INDEX_FILE)
}

/// Path of the knowledge base chunk texts inside `data_dir`.
pub fn kb_texts_file(data_dir: &Path) -> PathBuf {
    data_dir.join(KB_TEXTS_FILE)
}

/// Path of the preference document inside `data_dir`.
pub fn preferences_file(data_dir: &Path) -> PathBuf {
    data_dir.join(PREFERENCES_FILE)
}

/// Ensure the data directory exists.
pub fn ensure_data_dir(data_dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(data_dir)
}
