//! Travel agent runtime and session management for Wayfarer.
//!
//! This crate provides:
//! - The tool layer: six travel tools behind the [`Tool`] trait
//! - The custom search client used by the web and flight tools
//! - Per-user session tracking over a pluggable [`SessionService`]
//! - The [`AgentRuntime`] tool-calling loop

pub mod error;
pub mod prompt;
pub mod runtime;
pub mod search;
pub mod session;
pub mod tools;

pub use error::AgentError;
pub use runtime::{AgentEvent, AgentRuntime, RuntimeConfig, FALLBACK_RESPONSE};
pub use search::{CustomSearchClient, SearchFailure, SearchHit};
pub use session::{InMemorySessionService, Session, SessionManager, SessionService};
pub use tools::{Tool, ToolContext, ToolRegistry, ToolResult, TravelToolset};

/// Result type for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;
