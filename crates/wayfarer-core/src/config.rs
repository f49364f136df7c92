//! Runtime configuration.
//!
//! Wayfarer is configured entirely from the environment (optionally seeded
//! from a `.env` file, see [`crate::env::load_dotenv`]).

use crate::env::{self, vars};
use crate::error::ConfigError;
use crate::paths;
use secrecy::SecretString;
use std::path::{Path, PathBuf};

/// Default chat model.
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash";

/// Default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";

/// Default custom search endpoint.
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Top-level configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini credentials and model ids.
    pub model: ModelConfig,

    /// Custom search credentials.
    pub search: SearchConfig,

    /// HTTP listener settings.
    pub server: ServerConfig,

    /// On-disk state.
    pub data: DataConfig,
}

/// Gemini model configuration.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// API key used for both chat and embeddings.
    pub api_key: SecretString,

    /// Chat model id (e.g. `gemini-2.5-flash`).
    pub chat_model: String,

    /// Embedding model id (e.g. `text-embedding-004`).
    pub embedding_model: String,
}

/// Custom search configuration.
///
/// Both credentials are optional; the search tools report a structured
/// error when either is missing.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub api_key: Option<SecretString>,
    pub cx: Option<String>,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            cx: None,
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            timeout_secs: 10,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,

    /// Listen port.
    pub port: u16,

    /// HTML page served at `/`.
    pub index_html: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            index_html: PathBuf::from("index.html"),
        }
    }
}

/// Data directory configuration.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
        }
    }
}

impl DataConfig {
    pub fn kb_index_file(&self) -> PathBuf {
        paths::kb_index_file(&self.dir)
    }

    pub fn kb_texts_file(&self) -> PathBuf {
        paths::kb_texts_file(&self.dir)
    }

    pub fn preferences_file(&self) -> PathBuf {
        paths::preferences_file(&self.dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Config {
    /// Build configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env::get_var)
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values must be reported as `None` by `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(vars::GEMINI_API_KEY)
            .map(SecretString::new)
            .ok_or(ConfigError::Missing(vars::GEMINI_API_KEY))?;

        let port = match lookup(vars::PORT) {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: vars::PORT,
                value: raw.clone(),
            })?,
            None => ServerConfig::default().port,
        };

        let server_defaults = ServerConfig::default();
        let data_defaults = DataConfig::default();

        Ok(Self {
            model: ModelConfig {
                api_key,
                chat_model: lookup(vars::WAYFARER_MODEL)
                    .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
                embedding_model: lookup(vars::WAYFARER_EMBEDDING_MODEL)
                    .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            },
            search: SearchConfig {
                api_key: lookup(vars::CUSTOM_SEARCH_API_KEY).map(SecretString::new),
                cx: lookup(vars::CUSTOM_SEARCH_CX),
                ..SearchConfig::default()
            },
            server: ServerConfig {
                host: lookup(vars::WAYFARER_HOST).unwrap_or(server_defaults.host),
                port,
                index_html: lookup(vars::WAYFARER_INDEX_HTML)
                    .map(PathBuf::from)
                    .unwrap_or(server_defaults.index_html),
            },
            data: DataConfig {
                dir: lookup(vars::WAYFARER_DATA_DIR)
                    .map(PathBuf::from)
                    .unwrap_or(data_defaults.dir),
            },
        })
    }

    /// `host:port` string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
