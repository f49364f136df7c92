//! Chat model providers for Wayfarer.
//!
//! A [`Provider`] turns a conversation (plus optional tool declarations)
//! into one model response. The only implementation shipped is
//! [`GoogleProvider`], which talks to the Gemini `generateContent` API.
//!
//! # Example
//!
//! ```rust,ignore
//! use wayfarer_providers::{GoogleProvider, Message, Provider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleProvider::new("your-api-key")?;
//!
//!     let messages = vec![Message::user("Suggest a weekend in Kyoto")];
//!
//!     let response = provider.chat("gemini-2.5-flash", &messages, None).await?;
//!     println!("Response: {}", response.content);
//!
//!     Ok(())
//! }
//! ```

mod error;
mod types;

pub mod google;

pub use error::{ProviderError, Result};
pub use google::GoogleProvider;
pub use types::*;

use async_trait::async_trait;

/// A model provider that can generate completions.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get provider name.
    fn name(&self) -> &str;

    /// Generate a chat completion.
    ///
    /// The response either carries text, tool calls, or both. Callers drive
    /// the tool loop themselves.
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        options: Option<ChatOptions>,
    ) -> Result<ChatResponse>;
}
