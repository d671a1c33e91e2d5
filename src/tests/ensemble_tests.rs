//! Ensemble behavior across strategies: merge, dedup, failure policy

use std::sync::Arc;

use crate::errors::RagweaveError;
use crate::models::Chunk;
use crate::models::RetrievalRequest;
use crate::rag::ContextSelector;
use crate::retriever::EnsembleRetriever;
use crate::retriever::FailurePolicy;
use crate::retriever::RetrieverStrategy;
use crate::retriever::StrategyKind;
use crate::tests::support::FailingKeywordStore;
use crate::tests::support::FailingVectorStore;
use crate::tests::support::ScriptedKeywordStore;
use crate::tests::support::ScriptedVectorStore;

fn strategy(kind: StrategyKind) -> RetrieverStrategy {
    RetrieverStrategy {
        kind,
        top_k: 10,
        score_threshold: None,
        child_chunk_size: 128,
        child_chunk_overlap: 16,
    }
}

fn request() -> RetrievalRequest {
    RetrievalRequest::new("test query", "docs")
}

// The worked example: strategy A (vector) returns [x1, x2, x3], B
// (keyword) returns [x2, x4], registered in order [A, B].
fn worked_example_ensemble() -> EnsembleRetriever<ScriptedVectorStore, ScriptedKeywordStore> {
    let x1 = Chunk::new("report", 2, "alpha alpha").with_score(0.9);
    let x2 = Chunk::new("report", 1, "beta beta beta").with_score(0.8);
    let x3 = Chunk::new("report", 5, "gamma").with_score(0.7);
    let x2_from_b = Chunk::new("report", 1, "beta beta beta").with_score(0.99);
    let x4 = Chunk::new("other", 0, "delta").with_score(0.4);

    EnsembleRetriever::new(
        Arc::new(ScriptedVectorStore {
            results: vec![x1, x2, x3],
        }),
        Arc::new(ScriptedKeywordStore {
            results: vec![x2_from_b, x4],
        }),
        vec![
            strategy(StrategyKind::BaselineVector),
            strategy(StrategyKind::Keyword),
        ],
        FailurePolicy::ToleratePartial,
    )
    .unwrap()
}

#[tokio::test]
async fn test_worked_example_merge_order_and_dedup() {
    let ensemble = worked_example_ensemble();
    let merged = ensemble.retrieve(&request()).await.unwrap();

    let ids: Vec<(String, u32)> = merged
        .iter()
        .map(|c| (c.key.source.clone(), c.key.chunk_index))
        .collect();
    assert_eq!(
        ids,
        vec![
            ("report".to_string(), 2),
            ("report".to_string(), 1),
            ("report".to_string(), 5),
            ("other".to_string(), 0),
        ]
    );
    // x2 kept from A, the earlier-registered strategy
    assert!((merged[1].score - 0.8).abs() < f32::EPSILON);
}

#[tokio::test]
async fn test_worked_example_budget_then_sort() {
    let ensemble = worked_example_ensemble();
    let merged = ensemble.retrieve(&request()).await.unwrap();

    // M = |x1| + |x2| keeps exactly the first two merged chunks
    let m = merged[0].text.len() + merged[1].text.len();

    let unsorted = ContextSelector::new(m, false).select(merged.clone());
    assert_eq!(unsorted.len(), 2);
    assert_eq!(unsorted[0].key.chunk_index, 2); // x1
    assert_eq!(unsorted[1].key.chunk_index, 1); // x2

    // With the coherence sort, same membership in document order
    let sorted = ContextSelector::new(m, true).select(merged);
    assert_eq!(sorted.len(), 2);
    assert_eq!(sorted[0].key.chunk_index, 1); // x2
    assert_eq!(sorted[1].key.chunk_index, 2); // x1
}

#[tokio::test]
async fn test_mix_strategy_merges_internally() {
    let shared = Chunk::new("doc", 0, "shared").with_score(0.9);
    let dense_only = Chunk::new("doc", 1, "dense").with_score(0.5);
    let lexical_only = Chunk::new("doc", 2, "lexical").with_score(3.0);

    let ensemble = EnsembleRetriever::new(
        Arc::new(ScriptedVectorStore {
            results: vec![shared.clone(), dense_only],
        }),
        Arc::new(ScriptedKeywordStore {
            results: vec![lexical_only, shared],
        }),
        vec![strategy(StrategyKind::Mix)],
        FailurePolicy::ToleratePartial,
    )
    .unwrap();

    let merged = ensemble.retrieve(&request()).await.unwrap();
    // One strategy output: dense hits first, then lexical, shared deduped
    let indices: Vec<u32> = merged.iter().map(|c| c.key.chunk_index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_partial_failure_is_tolerated() {
    let surviving = Chunk::new("doc", 0, "still here").with_score(1.0);
    let ensemble = EnsembleRetriever::new(
        Arc::new(FailingVectorStore),
        Arc::new(ScriptedKeywordStore {
            results: vec![surviving],
        }),
        vec![
            strategy(StrategyKind::BaselineVector),
            strategy(StrategyKind::Keyword),
        ],
        FailurePolicy::ToleratePartial,
    )
    .unwrap();

    let merged = ensemble.retrieve(&request()).await.unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].key.chunk_index, 0);
}

#[tokio::test]
async fn test_all_strategies_failing_reports_retrieval_failure() {
    let ensemble = EnsembleRetriever::new(
        Arc::new(FailingVectorStore),
        Arc::new(FailingKeywordStore),
        vec![
            strategy(StrategyKind::BaselineVector),
            strategy(StrategyKind::Keyword),
        ],
        FailurePolicy::ToleratePartial,
    )
    .unwrap();

    let err = ensemble.retrieve(&request()).await.unwrap_err();
    assert!(matches!(err, RagweaveError::RetrievalFailed(_)));
}

#[tokio::test]
async fn test_fail_fast_aborts_on_single_failure() {
    let surviving = Chunk::new("doc", 0, "still here").with_score(1.0);
    let ensemble = EnsembleRetriever::new(
        Arc::new(FailingVectorStore),
        Arc::new(ScriptedKeywordStore {
            results: vec![surviving],
        }),
        vec![
            strategy(StrategyKind::BaselineVector),
            strategy(StrategyKind::Keyword),
        ],
        FailurePolicy::FailFast,
    )
    .unwrap();

    let err = ensemble.retrieve(&request()).await.unwrap_err();
    assert!(matches!(err, RagweaveError::StoreError(_)));
}

#[test]
fn test_empty_strategy_list_is_a_config_error() {
    let result = EnsembleRetriever::new(
        Arc::new(FailingVectorStore),
        Arc::new(FailingKeywordStore),
        Vec::new(),
        FailurePolicy::ToleratePartial,
    );
    assert!(matches!(result, Err(RagweaveError::ConfigError(_))));
}
