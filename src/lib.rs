pub mod config;
pub mod embeddings;
pub mod errors;
pub mod llm;
pub mod logging;
pub mod models;
pub mod rag;
pub mod retriever;
pub mod splitter;
pub mod store;

#[cfg(test)]
pub mod tests;

pub use config::AppConfig;
pub use errors::*;
pub use models::Chunk;
pub use models::ChunkKey;
pub use rag::RagService;
