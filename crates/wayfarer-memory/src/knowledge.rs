//! The travel knowledge base: chunk texts joined positionally with a
//! [`FlatIndex`].

use crate::chunker::TextSplitter;
use crate::embeddings::EmbeddingProvider;
use crate::index::FlatIndex;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Message returned instead of results when nothing is indexed.
pub const EMPTY_KB_MESSAGE: &str = "Knowledge base is empty.";

/// A source document fed to the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    /// Label such as a file name.
    pub source: String,
}

impl Document {
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
        }
    }
}

/// One chunk produced at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeChunk {
    pub text: String,
    pub source: String,
}

/// One search hit. `score` is the squared L2 distance (lower is closer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KbHit {
    pub text: String,
    pub score: f32,
    pub index: usize,
}

/// Reply of [`KnowledgeBase::search`], serialised as-is for the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KbSearchResponse {
    pub query: String,
    pub results: Vec<KbHit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Searchable knowledge base.
pub struct KnowledgeBase {
    index: Option<FlatIndex>,
    texts: Vec<String>,
    embeddings: Arc<dyn EmbeddingProvider>,
}

impl KnowledgeBase {
    /// A knowledge base with nothing in it. Every search reports
    /// [`EMPTY_KB_MESSAGE`].
    pub fn empty(embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            index: None,
            texts: Vec::new(),
            embeddings,
        }
    }

    pub fn new(index: FlatIndex, texts: Vec<String>, embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        if index.len() != texts.len() {
            warn!(
                vectors = index.len(),
                texts = texts.len(),
                "Knowledge base index and texts differ in length"
            );
        }
        Self {
            index: Some(index),
            texts,
            embeddings,
        }
    }

    /// Load both files written by [`KnowledgeBase::save`].
    ///
    /// Missing or unreadable files yield an empty knowledge base.
    pub fn load(index_path: &Path, texts_path: &Path, embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        match Self::try_load(index_path, texts_path) {
            Ok((index, texts)) => {
                info!(chunks = texts.len(), path = %index_path.display(), "Loaded knowledge base");
                Self::new(index, texts, embeddings)
            }
            Err(e) => {
                warn!(path = %index_path.display(), error = %e, "Knowledge base unavailable, starting empty");
                Self::empty(embeddings)
            }
        }
    }

    fn try_load(index_path: &Path, texts_path: &Path) -> Result<(FlatIndex, Vec<String>)> {
        let index = FlatIndex::load(index_path)?;
        let data = std::fs::read_to_string(texts_path)?;
        let texts: Vec<String> = serde_json::from_str(&data)?;
        Ok((index, texts))
    }

    /// Persist the index and the chunk texts side by side.
    pub fn save(&self, index_path: &Path, texts_path: &Path) -> Result<()> {
        let dimension = self.embeddings.dimension();
        let empty;
        let index = match &self.index {
            Some(index) => index,
            None => {
                empty = FlatIndex::new(dimension);
                &empty
            }
        };
        index.save(index_path)?;

        if let Some(parent) = texts_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp_path = texts_path.with_extension("tmp");
        std::fs::write(&tmp_path, serde_json::to_string_pretty(&self.texts)?)?;
        std::fs::rename(&tmp_path, texts_path)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() || self.index.as_ref().map_or(true, FlatIndex::is_empty)
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Embed `query` and return up to `top_k` nearest chunks.
    ///
    /// Positions the index knows about but the text list does not are
    /// skipped.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<KbSearchResponse> {
        let index = match &self.index {
            Some(index) if !self.is_empty() => index,
            _ => {
                return Ok(KbSearchResponse {
                    query: query.to_string(),
                    results: Vec::new(),
                    message: Some(EMPTY_KB_MESSAGE.to_string()),
                })
            }
        };

        let vector = self.embeddings.embed_one(query).await?;
        let neighbors = index.search(&vector, top_k)?;

        let results = neighbors
            .into_iter()
            .filter_map(|n| {
                self.texts.get(n.index).map(|text| KbHit {
                    text: text.clone(),
                    score: n.distance,
                    index: n.index,
                })
            })
            .collect::<Vec<_>>();

        debug!(query, hits = results.len(), "Knowledge base search");

        Ok(KbSearchResponse {
            query: query.to_string(),
            results,
            message: None,
        })
    }
}

/// Offline builder: chunk, embed, and index a set of documents.
pub struct KnowledgeBaseBuilder {
    splitter: TextSplitter,
    embeddings: Arc<dyn EmbeddingProvider>,
}

impl KnowledgeBaseBuilder {
    pub fn new(embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            splitter: TextSplitter::default(),
            embeddings,
        }
    }

    pub fn with_splitter(mut self, splitter: TextSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    /// Split every document, keeping the source label on each chunk.
    pub fn chunk(&self, documents: &[Document]) -> Vec<KnowledgeChunk> {
        documents
            .iter()
            .flat_map(|doc| {
                self.splitter
                    .split(&doc.content)
                    .into_iter()
                    .map(|chunk| KnowledgeChunk {
                        text: chunk.text,
                        source: doc.source.clone(),
                    })
            })
            .collect()
    }

    /// Build a knowledge base. Returns `None` when the documents produce no
    /// chunks.
    pub async fn build(&self, documents: &[Document]) -> Result<Option<KnowledgeBase>> {
        let chunks = self.chunk(documents);
        if chunks.is_empty() {
            warn!("No documents to process");
            return Ok(None);
        }

        info!("Split {} documents into {} chunks", documents.len(), chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            debug!(index = i, source = %chunk.source, chars = chunk.text.chars().count(), "Chunk");
        }

        let texts: Vec<String> = chunks.into_iter().map(|c| c.text).collect();
        let vectors = self.embeddings.embed(&texts).await?;

        let mut index = FlatIndex::new(self.embeddings.dimension());
        index.add(vectors)?;

        Ok(Some(KnowledgeBase::new(index, texts, self.embeddings.clone())))
    }
}
