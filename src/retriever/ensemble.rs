//! Ensemble retrieval: concurrent fan-out, merge and dedup
//!
//! Strategy scores are not comparable across heterogeneous strategies,
//! so the merge concatenates per-strategy lists in registration order
//! instead of re-ranking by score, then drops later duplicates.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::debug;
use tracing::warn;

use crate::config::AppConfig;
use crate::errors::RagweaveError;
use crate::errors::Result;
use crate::models::Chunk;
use crate::models::ChunkKey;
use crate::models::RetrievalRequest;
use crate::retriever::RetrieverStrategy;
use crate::store::KeywordStore;
use crate::store::VectorStore;

/// What to do when a strategy cannot reach its backing store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Proceed with the remaining strategies; fail only when every
    /// strategy has failed.
    #[default]
    ToleratePartial,
    /// Abort the request on the first strategy failure
    FailFast,
}

impl FailurePolicy {
    /// Parse a policy tag from configuration
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "tolerate-partial" => Ok(Self::ToleratePartial),
            "fail-fast" => Ok(Self::FailFast),
            other => Err(RagweaveError::ConfigError(format!(
                "Unknown failure policy: {other}"
            ))),
        }
    }
}

/// Merge ranked lists in registration order, deduplicating by chunk
/// key. The first occurrence wins: a chunk recovered by an
/// earlier-registered strategy shadows the same chunk from a later
/// one, whose score and position are discarded.
pub fn merge_ranked_lists(lists: Vec<Vec<Chunk>>) -> Vec<Chunk> {
    let mut seen: HashSet<ChunkKey> = HashSet::new();
    let mut merged = Vec::new();

    for list in lists {
        for chunk in list {
            if seen.insert(chunk.key.clone()) {
                merged.push(chunk);
            }
        }
    }

    merged
}

/// Fans one request out to every registered strategy and merges the
/// results into a single deduplicated list.
pub struct EnsembleRetriever<V, K> {
    vector_store: Arc<V>,
    keyword_store: Arc<K>,
    strategies: Vec<RetrieverStrategy>,
    failure_policy: FailurePolicy,
}

impl<V: VectorStore, K: KeywordStore> EnsembleRetriever<V, K> {
    /// Create an ensemble over the given stores.
    ///
    /// # Errors
    /// Fails fast if the strategy list is empty.
    pub fn new(
        vector_store: Arc<V>,
        keyword_store: Arc<K>,
        strategies: Vec<RetrieverStrategy>,
        failure_policy: FailurePolicy,
    ) -> Result<Self> {
        if strategies.is_empty() {
            return Err(RagweaveError::ConfigError(
                "At least one retriever strategy must be configured".to_string(),
            ));
        }

        Ok(Self {
            vector_store,
            keyword_store,
            strategies,
            failure_policy,
        })
    }

    /// Create an ensemble from application configuration
    pub fn from_config(
        config: &AppConfig,
        vector_store: Arc<V>,
        keyword_store: Arc<K>,
    ) -> Result<Self> {
        let strategies = config
            .retriever
            .strategies
            .iter()
            .map(RetrieverStrategy::from_config)
            .collect::<Result<Vec<_>>>()?;
        let failure_policy = FailurePolicy::parse(&config.retriever.failure_policy)?;

        Self::new(vector_store, keyword_store, strategies, failure_policy)
    }

    /// Registered strategies, in registration order
    pub fn strategies(&self) -> &[RetrieverStrategy] {
        &self.strategies
    }

    /// Retrieve a merged, deduplicated chunk list for the request.
    ///
    /// Strategy calls run concurrently; the merge waits for all of
    /// them. Output preserves the order chunks were first encountered
    /// across strategy outputs in registration order, with no two
    /// elements sharing a (source, chunk_index) key.
    pub async fn retrieve(&self, request: &RetrievalRequest) -> Result<Vec<Chunk>> {
        let calls = self.strategies.iter().map(|strategy| async move {
            let result = strategy
                .retrieve(request, &*self.vector_store, &*self.keyword_store)
                .await;
            (strategy.kind.name(), result)
        });

        let outcomes = join_all(calls).await;

        let mut lists = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();

        for (name, outcome) in outcomes {
            match outcome {
                Ok(list) => {
                    debug!("Strategy {name} returned {} chunks", list.len());
                    lists.push(list);
                }
                Err(e) => match self.failure_policy {
                    FailurePolicy::FailFast => return Err(e),
                    FailurePolicy::ToleratePartial => {
                        warn!("Strategy {name} failed, continuing without it: {e}");
                        failures.push(format!("{name}: {e}"));
                    }
                },
            }
        }

        if lists.is_empty() {
            return Err(RagweaveError::RetrievalFailed(format!(
                "All retriever strategies failed: {}",
                failures.join("; ")
            )));
        }

        let merged = merge_ranked_lists(lists);
        debug!("Ensemble merged result: {} unique chunks", merged.len());
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Chunk;

    fn chunk(source: &str, index: u32, text: &str, score: f32) -> Chunk {
        Chunk::new(source, index, text).with_score(score)
    }

    #[test]
    fn test_merge_dedup_first_occurrence_wins() {
        let a = vec![
            chunk("doc", 1, "x1 from A", 0.9),
            chunk("doc", 2, "x2 from A", 0.8),
        ];
        let b = vec![
            chunk("doc", 2, "x2 from B", 0.99),
            chunk("doc", 4, "x4 from B", 0.5),
        ];

        let merged = merge_ranked_lists(vec![a, b]);
        assert_eq!(merged.len(), 3);
        // The duplicate key kept the earlier-registered strategy's version
        assert_eq!(merged[1].text, "x2 from A");
        assert!((merged[1].score - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_merge_no_duplicate_keys() {
        let a = vec![chunk("a", 0, "t", 1.0), chunk("b", 0, "t", 0.9)];
        let b = vec![chunk("a", 0, "t", 0.8), chunk("b", 1, "t", 0.7)];
        let merged = merge_ranked_lists(vec![a, b]);

        let mut keys: Vec<_> = merged.iter().map(|c| c.key.clone()).collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }

    #[test]
    fn test_merge_preserves_first_encounter_order() {
        let a = vec![
            chunk("doc", 1, "x1", 0.9),
            chunk("doc", 2, "x2", 0.8),
            chunk("doc", 3, "x3", 0.7),
        ];
        let b = vec![chunk("doc", 2, "x2", 0.95), chunk("doc", 4, "x4", 0.6)];

        let merged = merge_ranked_lists(vec![a, b]);
        let indices: Vec<u32> = merged.iter().map(|c| c.key.chunk_index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_merge_empty_inputs() {
        assert!(merge_ranked_lists(Vec::new()).is_empty());
        assert!(merge_ranked_lists(vec![Vec::new(), Vec::new()]).is_empty());
    }

    #[test]
    fn test_failure_policy_parse() {
        assert_eq!(
            FailurePolicy::parse("tolerate-partial").unwrap(),
            FailurePolicy::ToleratePartial
        );
        assert_eq!(
            FailurePolicy::parse("fail-fast").unwrap(),
            FailurePolicy::FailFast
        );
        assert!(FailurePolicy::parse("retry").is_err());
    }
}
