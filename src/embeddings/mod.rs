//! Embedding generation: the dense-vector side of retrieval
//!
//! The vector store embeds texts through the [`Embedder`] seam; the
//! shipped implementation is [`EmbeddingClient`], which talks to an
//! OpenAI-compatible or Ollama endpoint, or computes deterministic
//! local feature-hash vectors for offline use and tests.

pub mod client;

pub use client::EmbeddingClient;
pub use client::EmbeddingProvider;

use crate::errors::Result;

/// Capability of turning text into a dense vector.
///
/// Treated as a remote service call: implementations may fail with
/// network or provider errors, which retrieval reports upward.
#[allow(async_fn_in_trait)]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}
