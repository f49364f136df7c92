//! CLI command implementations.

pub mod build_kb;
pub mod serve;

use anyhow::Context;
use std::path::PathBuf;
use wayfarer_core::Config;

/// Load configuration from the environment and apply a data dir override.
pub(crate) fn load_config(data_dir: Option<PathBuf>) -> anyhow::Result<Config> {
    let mut config = Config::from_env().context("Invalid configuration")?;
    if let Some(dir) = data_dir {
        config.data.dir = dir;
    }
    Ok(config)
}
