//! Embedding generation providers.

use crate::error::MemoryError;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default Google AI API base URL.
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Largest batch `batchEmbedContents` accepts.
const MAX_BATCH: usize = 100;

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the embedding dimension.
    fn dimension(&self) -> usize;

    /// Generate embeddings for texts, one vector per input in order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Generate embedding for a single text.
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| MemoryError::Embedding("No embedding returned".to_string()))
    }
}

/// Gemini embeddings provider (`batchEmbedContents`).
pub struct GeminiEmbeddings {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl GeminiEmbeddings {
    /// Create a new Gemini embeddings provider using `text-embedding-004`.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_secret(SecretString::new(api_key.into()))
    }

    pub fn from_secret(api_key: SecretString) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: "text-embedding-004".to_string(),
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        #[derive(Serialize)]
        struct Request<'a> {
            requests: Vec<EmbedRequest<'a>>,
        }

        #[derive(Serialize)]
        struct EmbedRequest<'a> {
            model: String,
            content: Content<'a>,
        }

        #[derive(Serialize)]
        struct Content<'a> {
            parts: [Part<'a>; 1],
        }

        #[derive(Serialize)]
        struct Part<'a> {
            text: &'a str,
        }

        #[derive(Deserialize)]
        struct Response {
            #[serde(default)]
            embeddings: Vec<Embedding>,
        }

        #[derive(Deserialize)]
        struct Embedding {
            values: Vec<f32>,
        }

        let model = format!("models/{}", self.model);
        let request = Request {
            requests: texts
                .iter()
                .map(|text| EmbedRequest {
                    model: model.clone(),
                    content: Content {
                        parts: [Part {
                            text: text.as_str(),
                        }],
                    },
                })
                .collect(),
        };

        let response = self
            .client
            .post(format!(
                "{}/models/{}:batchEmbedContents",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(MemoryError::Embedding(format!(
                "API error ({}): {}",
                status.as_u16(),
                text
            )));
        }

        let response: Response = response.json().await?;
        if response.embeddings.len() != texts.len() {
            return Err(MemoryError::Embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                response.embeddings.len()
            )));
        }

        Ok(response.embeddings.into_iter().map(|e| e.values).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddings {
    fn dimension(&self) -> usize {
        match self.model.as_str() {
            "text-embedding-004" | "embedding-001" => 768,
            "gemini-embedding-001" => 3072,
            _ => 768,
        }
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_BATCH) {
            debug!(model = %self.model, count = batch.len(), "Embedding batch");
            vectors.extend(self.embed_batch(batch).await?);
        }
        Ok(vectors)
    }
}
