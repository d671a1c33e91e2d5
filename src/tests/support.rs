//! Test doubles for the store seams

use crate::errors::RagweaveError;
use crate::errors::Result;
use crate::models::Chunk;
use crate::store::KeywordStore;
use crate::store::VectorStore;

/// Vector store returning a fixed ranked list for every query
pub struct ScriptedVectorStore {
    pub results: Vec<Chunk>,
}

impl VectorStore for ScriptedVectorStore {
    async fn search(
        &self,
        _query: &str,
        _collection: &str,
        top_k: usize,
        _score_threshold: Option<f32>,
    ) -> Result<Vec<Chunk>> {
        Ok(self.results.iter().take(top_k).cloned().collect())
    }

    async fn write(&self, _chunks: &[Chunk], _collection: &str, _drop_old: bool) -> Result<()> {
        Ok(())
    }
}

/// Keyword store returning a fixed ranked list for every query
pub struct ScriptedKeywordStore {
    pub results: Vec<Chunk>,
}

impl KeywordStore for ScriptedKeywordStore {
    async fn search(&self, _query: &str, _collection: &str, top_k: usize) -> Result<Vec<Chunk>> {
        Ok(self.results.iter().take(top_k).cloned().collect())
    }

    async fn write(&self, _chunks: &[Chunk], _collection: &str, _drop_old: bool) -> Result<()> {
        Ok(())
    }
}

/// Vector store whose backing engine is unreachable
pub struct FailingVectorStore;

impl VectorStore for FailingVectorStore {
    async fn search(
        &self,
        _query: &str,
        _collection: &str,
        _top_k: usize,
        _score_threshold: Option<f32>,
    ) -> Result<Vec<Chunk>> {
        Err(RagweaveError::StoreError(
            "vector store unreachable".to_string(),
        ))
    }

    async fn write(&self, _chunks: &[Chunk], _collection: &str, _drop_old: bool) -> Result<()> {
        Err(RagweaveError::StoreError(
            "vector store unreachable".to_string(),
        ))
    }
}

/// Keyword store whose backing engine is unreachable
pub struct FailingKeywordStore;

impl KeywordStore for FailingKeywordStore {
    async fn search(&self, _query: &str, _collection: &str, _top_k: usize) -> Result<Vec<Chunk>> {
        Err(RagweaveError::StoreError(
            "keyword store unreachable".to_string(),
        ))
    }

    async fn write(&self, _chunks: &[Chunk], _collection: &str, _drop_old: bool) -> Result<()> {
        Err(RagweaveError::StoreError(
            "keyword store unreachable".to_string(),
        ))
    }
}
