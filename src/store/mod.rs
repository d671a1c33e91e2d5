//! Chunk store adapters: narrow read/write interfaces over the dense
//! vector index and the keyword (lexical) index
//!
//! The storage engines themselves are external collaborators; this
//! module defines their call contracts and provides in-memory
//! reference implementations used by tests and by the default wiring
//! when no external store is injected.

pub mod memory;

pub use memory::MemoryKeywordStore;
pub use memory::MemoryVectorStore;

use crate::errors::Result;
use crate::models::Chunk;

/// Dense-vector similarity index over chunks.
///
/// Returned chunks are ordered by descending similarity and fully
/// populated with metadata; scores are store-local.
#[allow(async_fn_in_trait)]
pub trait VectorStore: Send + Sync {
    /// Similarity search for `query` in `collection`
    async fn search(
        &self,
        query: &str,
        collection: &str,
        top_k: usize,
        score_threshold: Option<f32>,
    ) -> Result<Vec<Chunk>>;

    /// Write chunks into `collection`; `drop_old` rebuilds the
    /// collection instead of appending.
    async fn write(&self, chunks: &[Chunk], collection: &str, drop_old: bool) -> Result<()>;
}

/// Keyword (lexical) index over chunks, same write contract as the
/// vector store.
#[allow(async_fn_in_trait)]
pub trait KeywordStore: Send + Sync {
    /// Lexical search for `query` in `collection`
    async fn search(&self, query: &str, collection: &str, top_k: usize) -> Result<Vec<Chunk>>;

    /// Write chunks into `collection`; `drop_old` rebuilds the
    /// collection instead of appending.
    async fn write(&self, chunks: &[Chunk], collection: &str, drop_old: bool) -> Result<()>;
}
