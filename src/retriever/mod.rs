//! Retrieval strategies and their ensemble
//!
//! Each strategy answers a [`RetrievalRequest`](crate::models::RetrievalRequest)
//! with a ranked chunk list; the [`EnsembleRetriever`] fans a request
//! out to every registered strategy and merges the lists into one
//! deduplicated result.

pub mod ensemble;
pub mod strategy;

pub use ensemble::merge_ranked_lists;
pub use ensemble::EnsembleRetriever;
pub use ensemble::FailurePolicy;
pub use strategy::RetrieverStrategy;
pub use strategy::StrategyKind;

/// Child collection holding the finer-grained chunks used by the
/// smaller-chunks strategy.
pub(crate) fn child_collection(collection: &str) -> String {
    format!("{collection}/child")
}
