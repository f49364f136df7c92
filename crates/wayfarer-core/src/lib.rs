//! # wayfarer-core
//!
//! Configuration and shared utilities for Wayfarer.
//!
//! This crate provides the pieces every other Wayfarer crate needs:
//!
//! - **Configuration**: environment-driven settings with `.env` support
//! - **Paths**: locations of the knowledge base and preference files
//! - **Secrets**: API keys held as [`secrecy::SecretString`]

pub mod config;
pub mod env;
pub mod error;
pub mod paths;

pub use config::{Config, DataConfig, ModelConfig, SearchConfig, ServerConfig};
pub use error::ConfigError;
pub use secrecy::{ExposeSecret, SecretString};
