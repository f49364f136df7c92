//! Knowledge base build command.

use super::load_config;
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use wayfarer_core::paths::ensure_data_dir;
use wayfarer_memory::{builtin_documents, load_documents_dir, GeminiEmbeddings, KnowledgeBaseBuilder};

/// Build command arguments.
#[derive(Args)]
pub struct BuildKbArgs {
    /// Directory of extra .txt/.md documents to index
    #[arg(long)]
    pub docs: Option<PathBuf>,

    /// Skip the built-in travel guides
    #[arg(long)]
    pub no_builtin: bool,

    /// Data directory (overrides WAYFARER_DATA_DIR)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

/// Run the build command.
pub async fn run(args: BuildKbArgs) -> anyhow::Result<()> {
    let config = load_config(args.data_dir)?;

    let mut documents = if args.no_builtin {
        Vec::new()
    } else {
        builtin_documents()
    };
    if let Some(dir) = &args.docs {
        let extra = load_documents_dir(dir)
            .with_context(|| format!("Failed to read documents from {}", dir.display()))?;
        info!("Loaded {} documents from {}", extra.len(), dir.display());
        documents.extend(extra);
    }

    let embeddings = Arc::new(
        GeminiEmbeddings::from_secret(config.model.api_key.clone())
            .with_model(config.model.embedding_model.clone()),
    );
    let builder = KnowledgeBaseBuilder::new(embeddings);

    let Some(knowledge) = builder.build(&documents).await? else {
        return Ok(());
    };

    ensure_data_dir(config.data.dir())?;
    let index_path = config.data.kb_index_file();
    let texts_path = config.data.kb_texts_file();
    knowledge.save(&index_path, &texts_path)?;

    info!(
        "Saved {} chunks to {} and {}",
        knowledge.len(),
        index_path.display(),
        texts_path.display()
    );
    Ok(())
}
