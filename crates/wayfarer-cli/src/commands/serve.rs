//! Serve command.

use super::load_config;
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use wayfarer_agent::{
    AgentRuntime, CustomSearchClient, InMemorySessionService, RuntimeConfig, SessionManager,
    ToolRegistry, TravelToolset,
};
use wayfarer_core::paths::ensure_data_dir;
use wayfarer_gateway::{AppState, Gateway, GatewayConfig};
use wayfarer_memory::{GeminiEmbeddings, KnowledgeBase, PreferenceStore};
use wayfarer_providers::GoogleProvider;

/// Application name sessions are created under.
pub const APP_NAME: &str = "travel_agent_app";

/// Serve command arguments.
#[derive(Args)]
pub struct ServeArgs {
    /// Bind address (overrides WAYFARER_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port number (overrides PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Data directory (overrides WAYFARER_DATA_DIR)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// HTML page served at / (overrides WAYFARER_INDEX_HTML)
    #[arg(long)]
    pub index_html: Option<PathBuf>,
}

/// Run the serve command.
pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.data_dir)?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(index_html) = args.index_html {
        config.server.index_html = index_html;
    }

    ensure_data_dir(config.data.dir()).with_context(|| {
        format!("Failed to create data directory {}", config.data.dir().display())
    })?;

    let api_key = config.model.api_key.clone();

    // Knowledge base
    let embeddings = Arc::new(
        GeminiEmbeddings::from_secret(api_key.clone())
            .with_model(config.model.embedding_model.clone()),
    );
    let knowledge = KnowledgeBase::load(
        &config.data.kb_index_file(),
        &config.data.kb_texts_file(),
        embeddings,
    );
    if knowledge.is_empty() {
        warn!("Knowledge base is empty; run `wayfarer build-kb` to create it");
    } else {
        info!("Loaded knowledge base with {} chunks", knowledge.len());
    }

    // Preferences
    let preferences = PreferenceStore::new(config.data.preferences_file());
    preferences
        .ensure_exists()
        .await
        .context("Failed to initialise preference store")?;

    // Search
    let search = CustomSearchClient::new(&config.search)?;
    if !search.is_configured() {
        warn!("CUSTOM_SEARCH_API_KEY or CUSTOM_SEARCH_CX not set; web and flight search will report an error");
    }

    let tools = ToolRegistry::travel_defaults(TravelToolset {
        knowledge: Arc::new(knowledge),
        preferences: Arc::new(preferences),
        search: Arc::new(search),
    })
    .await;
    info!("Registered tools: {}", tools.list().await.join(", "));

    // Agent
    let provider = Arc::new(GoogleProvider::from_secret(api_key)?);
    let service = Arc::new(InMemorySessionService::new());
    let sessions = Arc::new(SessionManager::new(service.clone(), APP_NAME));
    let runtime = AgentRuntime::new(provider, Arc::new(tools), service).with_config(RuntimeConfig {
        model: config.model.chat_model.clone(),
        ..Default::default()
    });
    info!("Using model {}", config.model.chat_model);

    let state = AppState::new(sessions, Arc::new(runtime), config.server.index_html.clone());
    Gateway::new(GatewayConfig::from(&config.server), state)
        .run()
        .await?;

    Ok(())
}
