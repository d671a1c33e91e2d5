//! The four retrieval strategy variants
//!
//! All variants obey the same contract: given a request, return a
//! list ordered by descending strategy-local relevance, every element
//! fully populated with metadata. A strategy that cannot reach its
//! backing store returns the error to the ensemble instead of
//! silently returning empty.

use std::collections::HashSet;

use tracing::debug;

use crate::config::StrategyConfig;
use crate::errors::RagweaveError;
use crate::errors::Result;
use crate::models::Chunk;
use crate::models::ChunkKey;
use crate::models::MetaValue;
use crate::models::RetrievalRequest;
use crate::models::META_PARENT_CHUNK_INDEX;
use crate::retriever::child_collection;
use crate::store::KeywordStore;
use crate::store::VectorStore;

/// Strategy variants selected by configuration tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Single dense-embedding similarity search
    BaselineVector,
    /// Lexical search against the keyword store
    Keyword,
    /// Dense + lexical searches merged strategy-internally
    Mix,
    /// Finer-granularity search mapped back to parent-chunk identity
    SmallerChunks,
}

impl StrategyKind {
    /// Parse a strategy tag from configuration
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "baseline-vector" => Ok(Self::BaselineVector),
            "keyword" => Ok(Self::Keyword),
            "mix" => Ok(Self::Mix),
            "smaller-chunks" => Ok(Self::SmallerChunks),
            other => Err(RagweaveError::ConfigError(format!(
                "Unknown retriever strategy: {other}"
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::BaselineVector => "baseline-vector",
            Self::Keyword => "keyword",
            Self::Mix => "mix",
            Self::SmallerChunks => "smaller-chunks",
        }
    }
}

/// A configured strategy instance
#[derive(Debug, Clone)]
pub struct RetrieverStrategy {
    pub kind: StrategyKind,
    pub top_k: usize,
    pub score_threshold: Option<f32>,
    /// Child-chunk splitter parameters, only used by `SmallerChunks`
    pub child_chunk_size: usize,
    pub child_chunk_overlap: usize,
}

impl RetrieverStrategy {
    /// Build a strategy from its configuration entry
    pub fn from_config(config: &StrategyConfig) -> Result<Self> {
        Ok(Self {
            kind: StrategyKind::parse(&config.kind)?,
            top_k: config.top_k,
            score_threshold: config.score_threshold,
            child_chunk_size: config.child_chunk_size,
            child_chunk_overlap: config.child_chunk_overlap,
        })
    }

    /// Run this strategy against the stores
    pub async fn retrieve<V: VectorStore, K: KeywordStore>(
        &self,
        request: &RetrievalRequest,
        vector_store: &V,
        keyword_store: &K,
    ) -> Result<Vec<Chunk>> {
        debug!(
            "Running {} strategy for query: {}",
            self.kind.name(),
            request.query
        );

        match self.kind {
            StrategyKind::BaselineVector => {
                vector_store
                    .search(
                        &request.query,
                        &request.collection,
                        self.top_k,
                        self.score_threshold,
                    )
                    .await
            }
            StrategyKind::Keyword => {
                keyword_store
                    .search(&request.query, &request.collection, self.top_k)
                    .await
            }
            StrategyKind::Mix => {
                self.retrieve_mix(request, vector_store, keyword_store)
                    .await
            }
            StrategyKind::SmallerChunks => {
                self.retrieve_smaller_chunks(request, vector_store).await
            }
        }
    }

    /// Dense + lexical search with a strategy-internal merge: vector
    /// hits first, keyword hits after, deduplicated by chunk key.
    /// Independent of the ensemble-level merge.
    async fn retrieve_mix<V: VectorStore, K: KeywordStore>(
        &self,
        request: &RetrievalRequest,
        vector_store: &V,
        keyword_store: &K,
    ) -> Result<Vec<Chunk>> {
        let dense = vector_store
            .search(
                &request.query,
                &request.collection,
                self.top_k,
                self.score_threshold,
            )
            .await?;
        let lexical = keyword_store
            .search(&request.query, &request.collection, self.top_k)
            .await?;

        let mut seen: HashSet<ChunkKey> = HashSet::new();
        let mut merged = Vec::with_capacity(dense.len() + lexical.len());
        for chunk in dense.into_iter().chain(lexical) {
            if seen.insert(chunk.key.clone()) {
                merged.push(chunk);
            }
        }

        Ok(merged)
    }

    /// Search the finer-grained child collection, then map hits back
    /// to their parent-chunk identity, keeping the best child per
    /// parent (first hit, lists are ordered by relevance).
    async fn retrieve_smaller_chunks<V: VectorStore>(
        &self,
        request: &RetrievalRequest,
        vector_store: &V,
    ) -> Result<Vec<Chunk>> {
        let children = vector_store
            .search(
                &request.query,
                &child_collection(&request.collection),
                self.top_k,
                self.score_threshold,
            )
            .await?;

        let mut seen_parents: HashSet<ChunkKey> = HashSet::new();
        let mut parents = Vec::with_capacity(children.len());

        for child in children {
            let parent_index = child
                .metadata
                .get(META_PARENT_CHUNK_INDEX)
                .and_then(MetaValue::as_int)
                .and_then(|i| u32::try_from(i).ok())
                .unwrap_or(child.key.chunk_index);

            let parent_key = ChunkKey::new(child.key.source.clone(), parent_index);
            if !seen_parents.insert(parent_key.clone()) {
                continue;
            }

            let mut chunk = child;
            chunk.key = parent_key;
            parents.push(chunk);
        }

        Ok(parents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_kind_parse_roundtrip() {
        for name in ["baseline-vector", "keyword", "mix", "smaller-chunks"] {
            assert_eq!(StrategyKind::parse(name).unwrap().name(), name);
        }
        assert!(StrategyKind::parse("bm25").is_err());
    }
}
