//! Complete RAG pipeline: Retrieve -> Select -> Generate

use std::sync::Arc;

use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::config::AppConfig;
use crate::embeddings::EmbeddingClient;
use crate::errors::RagweaveError;
use crate::errors::Result;
use crate::llm::build_qa_prompt;
use crate::llm::build_title_prompt;
use crate::llm::LlmClient;
use crate::models::Chunk;
use crate::models::RetrievalRequest;
use crate::models::META_PARENT_CHUNK_INDEX;
use crate::models::META_TITLE;
use crate::rag::ContextSelector;
use crate::retriever::child_collection;
use crate::retriever::EnsembleRetriever;
use crate::retriever::StrategyKind;
use crate::splitter::TextSplitter;
use crate::store::KeywordStore;
use crate::store::MemoryKeywordStore;
use crate::store::MemoryVectorStore;
use crate::store::VectorStore;

/// Default wiring: in-memory stores over the configured embedder
pub type MemoryRagService = RagService<MemoryVectorStore<EmbeddingClient>, MemoryKeywordStore>;

/// Complete RAG service over a pair of chunk stores
pub struct RagService<V, K> {
    vector_store: Arc<V>,
    keyword_store: Arc<K>,
    retriever: EnsembleRetriever<V, K>,
    selector: ContextSelector,
    llm: LlmClient,
    collection: String,
    splitter: TextSplitter,
    add_aux_info: bool,
    temperature: f32,
    max_tokens: usize,
}

impl MemoryRagService {
    /// Create a service with in-memory stores from configuration.
    ///
    /// # Errors
    /// - No collection identifier configured
    /// - Unknown strategy kind, failure policy or embedding provider
    /// - HTTP client build errors
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let embedder = Arc::new(EmbeddingClient::from_config(config)?);
        let vector_store = Arc::new(MemoryVectorStore::new(embedder));
        let keyword_store = Arc::new(MemoryKeywordStore::new());
        let llm = LlmClient::from_config(config)?;

        Self::from_stores(config, vector_store, keyword_store, llm)
    }
}

impl<V: VectorStore, K: KeywordStore> RagService<V, K> {
    /// Create a service over pre-built stores.
    ///
    /// # Errors
    /// - No collection identifier configured (fail fast, before any
    ///   query is accepted)
    /// - Unknown strategy kind or failure policy
    pub fn from_stores(
        config: &AppConfig,
        vector_store: Arc<V>,
        keyword_store: Arc<K>,
        llm: LlmClient,
    ) -> Result<Self> {
        if config.collection().is_empty() {
            return Err(RagweaveError::ConfigError(
                "A collection identifier must be configured".to_string(),
            ));
        }

        let retriever = EnsembleRetriever::from_config(
            config,
            Arc::clone(&vector_store),
            Arc::clone(&keyword_store),
        )?;
        let selector = ContextSelector::from_config(config);
        let splitter = TextSplitter::new(config.retriever.chunk_size, config.retriever.chunk_overlap);

        Ok(Self {
            vector_store,
            keyword_store,
            retriever,
            selector,
            llm,
            collection: config.collection().to_string(),
            splitter,
            add_aux_info: config.retriever.add_aux_info,
            temperature: config.generate.temperature,
            max_tokens: config.generate.max_tokens,
        })
    }

    /// Split a document into chunks and index it into both stores.
    ///
    /// Parent chunks go to the vector and keyword stores; when a
    /// smaller-chunks strategy is registered, finer child chunks are
    /// additionally written to the child collection with their parent
    /// linkage recorded in metadata. Returns the number of parent
    /// chunks written.
    pub async fn ingest_document(
        &self,
        source: &str,
        content: &str,
        drop_old: bool,
    ) -> Result<usize> {
        info!("Ingesting document: {source}");

        let pieces = self.splitter.split(content);
        if pieces.is_empty() {
            warn!("Document {source} produced no chunks");
            return Ok(0);
        }

        let title = if self.add_aux_info {
            Some(self.extract_title(content).await)
        } else {
            None
        };

        let mut parents = Vec::with_capacity(pieces.len());
        for (idx, text) in pieces.iter().enumerate() {
            let mut chunk = Chunk::new(source, idx as u32, text.clone());
            if let Some(title) = &title {
                chunk = chunk.with_metadata(META_TITLE, title.clone());
            }
            parents.push(chunk);
        }

        self.vector_store
            .write(&parents, &self.collection, drop_old)
            .await?;
        self.keyword_store
            .write(&parents, &self.collection, drop_old)
            .await?;

        if let Some(strategy) = self
            .retriever
            .strategies()
            .iter()
            .find(|s| s.kind == StrategyKind::SmallerChunks)
        {
            let child_splitter =
                TextSplitter::new(strategy.child_chunk_size, strategy.child_chunk_overlap);
            let mut children = Vec::new();
            let mut child_index = 0u32;

            for parent in &parents {
                for text in child_splitter.split(&parent.text) {
                    let child = Chunk::new(source, child_index, text).with_metadata(
                        META_PARENT_CHUNK_INDEX,
                        i64::from(parent.key.chunk_index),
                    );
                    children.push(child);
                    child_index += 1;
                }
            }

            self.vector_store
                .write(&children, &child_collection(&self.collection), drop_old)
                .await?;
            debug!("Wrote {} child chunks for {source}", children.len());
        }

        info!("Ingested {} chunks from {source}", parents.len());
        Ok(parents.len())
    }

    /// Extract a document title with the LLM; extraction failure is
    /// tolerated (logged, an empty title is attached instead).
    async fn extract_title(&self, content: &str) -> String {
        let prompt = build_title_prompt(content);
        match self.llm.generate(&prompt, 0.0, 64).await {
            Ok(title) => {
                let title = title.trim().to_string();
                debug!("Extracted title: {title}");
                title
            }
            Err(e) => {
                error!("Failed to extract title: {e}");
                String::new()
            }
        }
    }

    /// Retrieve and select context chunks for a query, without answer
    /// generation.
    ///
    /// # Errors
    /// - All retriever strategies failed (or any, under fail-fast)
    pub async fn search(&self, query: &str) -> Result<Vec<Chunk>> {
        let request = RetrievalRequest::new(query, self.collection.clone());
        let merged = self.retriever.retrieve(&request).await?;
        debug!("Retrieval returned {} merged chunks", merged.len());

        let selected = self.selector.select(merged);
        debug!("Context selection kept {} chunks", selected.len());
        Ok(selected)
    }

    /// Answer a query end to end.
    ///
    /// A generation failure is absorbed into the returned answer
    /// string, so the call succeeds at the interface level whenever
    /// retrieval succeeded.
    ///
    /// # Errors
    /// - Retrieval failure (all strategies failed, or any under
    ///   fail-fast) — distinct from generation failure
    pub async fn answer(&self, query: &str) -> Result<String> {
        info!("Processing RAG query: {query}");

        let chunks = self.search(query).await?;
        let prompt = build_qa_prompt(query, &chunks);

        let answer = match self.llm.generate(&prompt, self.temperature, self.max_tokens).await {
            Ok(answer) => answer,
            Err(e) => {
                error!("Answer generation failed for query '{query}': {e}");
                generation_failure_answer(&e)
            }
        };

        info!("RAG query completed");
        Ok(answer)
    }

    /// Blocking variant of [`Self::answer`] for synchronous callers.
    ///
    /// Spins up a current-thread runtime; must not be called from
    /// within an async context.
    pub fn answer_blocking(&self, query: &str) -> Result<String> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.answer(query))
    }

    /// Get ensemble retriever reference
    pub fn retriever(&self) -> &EnsembleRetriever<V, K> {
        &self.retriever
    }

    /// Get context selector reference
    pub fn selector(&self) -> &ContextSelector {
        &self.selector
    }

    /// Get target collection identifier
    pub fn collection(&self) -> &str {
        &self.collection
    }
}

/// The user-visible answer payload for a failed generation: the error
/// description stands in for the answer instead of propagating the
/// fault.
fn generation_failure_answer(error: &RagweaveError) -> String {
    error.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_failure_becomes_answer_payload() {
        let err = RagweaveError::GenerationError("model timed out".to_string());
        let answer = generation_failure_answer(&err);
        assert!(answer.contains("model timed out"));
    }
}
