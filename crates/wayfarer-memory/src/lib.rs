//! Retrieval and persistence for Wayfarer.
//!
//! This crate provides:
//! - Embedding generation via the Gemini API
//! - An exact L2 vector index persisted as JSON
//! - Text chunking and the offline knowledge base builder
//! - The JSON preference store

pub mod chunker;
pub mod corpus;
pub mod embeddings;
pub mod error;
pub mod index;
pub mod knowledge;
pub mod preferences;

pub use chunker::{TextChunk, TextSplitter};
pub use corpus::{builtin_documents, load_documents_dir};
pub use embeddings::{EmbeddingProvider, GeminiEmbeddings};
pub use error::MemoryError;
pub use index::{FlatIndex, Neighbor};
pub use knowledge::{
    Document, KbHit, KbSearchResponse, KnowledgeBase, KnowledgeBaseBuilder, KnowledgeChunk,
    EMPTY_KB_MESSAGE,
};
pub use preferences::PreferenceStore;

/// Result type for memory operations.
pub type Result<T> = std::result::Result<T, MemoryError>;
