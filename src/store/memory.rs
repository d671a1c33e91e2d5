//! In-memory reference stores
//!
//! Both stores keep whole collections in process memory behind
//! concurrent maps. They implement the same call contracts as external
//! engines and are good enough for tests, demos and small corpora.

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::embeddings::Embedder;
use crate::errors::Result;
use crate::models::Chunk;
use crate::store::KeywordStore;
use crate::store::VectorStore;

/// A chunk stored alongside its embedding vector
#[derive(Debug, Clone)]
struct StoredVector {
    chunk: Chunk,
    vector: Vec<f32>,
}

/// In-memory dense-vector store; embeds texts through the configured
/// [`Embedder`] on write and on query, ranks by cosine similarity.
pub struct MemoryVectorStore<E> {
    embedder: Arc<E>,
    collections: DashMap<String, Vec<StoredVector>>,
}

impl<E: Embedder> MemoryVectorStore<E> {
    pub fn new(embedder: Arc<E>) -> Self {
        Self {
            embedder,
            collections: DashMap::new(),
        }
    }

    /// Number of chunks currently held in `collection`
    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, |c| c.len())
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

impl<E: Embedder> VectorStore for MemoryVectorStore<E> {
    async fn search(
        &self,
        query: &str,
        collection: &str,
        top_k: usize,
        score_threshold: Option<f32>,
    ) -> Result<Vec<Chunk>> {
        let query_vector = self.embedder.embed(query).await?;

        let mut scored: Vec<Chunk> = self
            .collections
            .get(collection)
            .map(|entries| {
                entries
                    .iter()
                    .map(|stored| {
                        let score = cosine_similarity(&query_vector, &stored.vector);
                        stored.chunk.clone().with_score(score)
                    })
                    .filter(|chunk| score_threshold.map_or(true, |t| chunk.score >= t))
                    .collect()
            })
            .unwrap_or_default();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);

        debug!(
            "Vector search in '{collection}' returned {} chunks",
            scored.len()
        );
        Ok(scored)
    }

    async fn write(&self, chunks: &[Chunk], collection: &str, drop_old: bool) -> Result<()> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;

        let stored: Vec<StoredVector> = chunks
            .iter()
            .zip(vectors)
            .map(|(chunk, vector)| StoredVector {
                chunk: chunk.clone(),
                vector,
            })
            .collect();

        if drop_old {
            self.collections.remove(collection);
        }
        self.collections
            .entry(collection.to_string())
            .or_default()
            .extend(stored);

        debug!("Wrote {} chunks to vector collection '{collection}'", chunks.len());
        Ok(())
    }
}

/// In-memory lexical store ranking by tf·idf term matching
#[derive(Default)]
pub struct MemoryKeywordStore {
    collections: DashMap<String, Vec<Chunk>>,
}

impl MemoryKeywordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chunks currently held in `collection`
    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, |c| c.len())
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

impl KeywordStore for MemoryKeywordStore {
    async fn search(&self, query: &str, collection: &str, top_k: usize) -> Result<Vec<Chunk>> {
        let query_terms: HashSet<String> = tokenize(query).into_iter().collect();
        if query_terms.is_empty() {
            return Ok(Vec::new());
        }

        let Some(entries) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };

        let total_docs = entries.len() as f32;

        // Document frequency per query term
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        let tokenized: Vec<(usize, HashMap<String, usize>)> = entries
            .iter()
            .enumerate()
            .map(|(idx, chunk)| {
                let mut tf: HashMap<String, usize> = HashMap::new();
                for token in tokenize(&chunk.text) {
                    *tf.entry(token).or_insert(0) += 1;
                }
                (idx, tf)
            })
            .collect();

        for term in &query_terms {
            let df = tokenized
                .iter()
                .filter(|(_, tf)| tf.contains_key(term))
                .count();
            doc_freq.insert(term, df);
        }

        let mut scored: Vec<Chunk> = tokenized
            .iter()
            .filter_map(|(idx, tf)| {
                let mut score = 0.0f32;
                for term in &query_terms {
                    let term_freq = tf.get(term).copied().unwrap_or(0) as f32;
                    if term_freq > 0.0 {
                        let df = doc_freq.get(term.as_str()).copied().unwrap_or(0) as f32;
                        let idf = (1.0 + total_docs / (1.0 + df)).ln();
                        score += term_freq * idf;
                    }
                }
                if score > 0.0 {
                    Some(entries[*idx].clone().with_score(score))
                } else {
                    None
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);

        debug!(
            "Keyword search in '{collection}' returned {} chunks",
            scored.len()
        );
        Ok(scored)
    }

    async fn write(&self, chunks: &[Chunk], collection: &str, drop_old: bool) -> Result<()> {
        if drop_old {
            self.collections.remove(collection);
        }
        self.collections
            .entry(collection.to_string())
            .or_default()
            .extend(chunks.iter().cloned());

        debug!("Wrote {} chunks to keyword collection '{collection}'", chunks.len());
        Ok(())
    }
}
