//! Environment variable handling.

use crate::error::ConfigError;
use std::env;
use std::path::PathBuf;

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Load environment variables from a `.env` file in the working directory
/// or one of its parents.
///
/// Variables already present in the process environment win. A missing
/// file is not an error; returns the path that was loaded, if any.
pub fn load_dotenv() -> Result<Option<PathBuf>, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "Loaded .env file");
            Ok(Some(path))
        }
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(ConfigError::Dotenv(e.to_string())),
    }
}

/// Environment variable names read by Wayfarer.
pub mod vars {
    /// API key for Gemini chat and embeddings.
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

    /// API key for the custom search endpoint.
    pub const CUSTOM_SEARCH_API_KEY: &str = "CUSTOM_SEARCH_API_KEY";

    /// Search engine id for the custom search endpoint.
    pub const CUSTOM_SEARCH_CX: &str = "CUSTOM_SEARCH_CX";

    /// HTTP listen port.
    pub const PORT: &str = "PORT";

    /// HTTP listen address.
    pub const WAYFARER_HOST: &str = "WAYFARER_HOST";

    /// Chat model id.
    pub const WAYFARER_MODEL: &str = "WAYFARER_MODEL";

    /// Embedding model id.
    pub const WAYFARER_EMBEDDING_MODEL: &str = "WAYFARER_EMBEDDING_MODEL";

    /// Directory holding the knowledge base and preference files.
    pub const WAYFARER_DATA_DIR: &str = "WAYFARER_DATA_DIR";

    /// Static page served at `/`.
    pub const WAYFARER_INDEX_HTML: &str = "WAYFARER_INDEX_HTML";

    /// Log filter directive.
    pub const WAYFARER_LOG: &str = "WAYFARER_LOG";
}
