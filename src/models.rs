//! Core data model: chunks, their identity keys and retrieval requests

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

/// Metadata key carrying the source document identifier
pub const META_SOURCE: &str = "source";
/// Metadata key carrying the chunk position within its source document
pub const META_CHUNK_INDEX: &str = "chunk_index";
/// Metadata key linking a finer-grained child chunk to its parent chunk
pub const META_PARENT_CHUNK_INDEX: &str = "parent_chunk_index";
/// Metadata key for the optional LLM-extracted document title
pub const META_TITLE: &str = "title";

/// Scalar metadata value attached to a chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl MetaValue {
    /// Get the value as a string slice, if it is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer, if it is one
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Deduplication identity of a chunk: two chunks with the same key are
/// the same content unit no matter which strategy retrieved them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkKey {
    pub source: String,
    pub chunk_index: u32,
}

impl ChunkKey {
    pub fn new(source: impl Into<String>, chunk_index: u32) -> Self {
        Self {
            source: source.into(),
            chunk_index,
        }
    }
}

impl std::fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.source, self.chunk_index)
    }
}

/// A unit of retrievable text, immutable once produced by a strategy.
///
/// `score` is strategy-local relevance and is NOT comparable across
/// heterogeneous strategies; the ensemble merge therefore never orders
/// by score across lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub key: ChunkKey,
    pub text: String,
    pub metadata: HashMap<String, MetaValue>,
    pub score: f32,
}

impl Chunk {
    /// Create a chunk with the mandatory `source` / `chunk_index`
    /// metadata entries filled in from the key.
    pub fn new(source: impl Into<String>, chunk_index: u32, text: impl Into<String>) -> Self {
        let key = ChunkKey::new(source, chunk_index);
        let mut metadata = HashMap::new();
        metadata.insert(META_SOURCE.to_string(), MetaValue::Str(key.source.clone()));
        metadata.insert(
            META_CHUNK_INDEX.to_string(),
            MetaValue::Int(i64::from(chunk_index)),
        );

        Self {
            key,
            text: text.into(),
            metadata,
            score: 0.0,
        }
    }

    /// Attach a metadata entry, consuming and returning the chunk
    pub fn with_metadata(mut self, name: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.metadata.insert(name.into(), value.into());
        self
    }

    /// Set the strategy-local relevance score
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }
}

/// One retrieval call; constructed per query, never persisted
#[derive(Debug, Clone)]
pub struct RetrievalRequest {
    pub query: String,
    pub collection: String,
}

impl RetrievalRequest {
    pub fn new(query: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            collection: collection.into(),
        }
    }
}
