//! RAG core: context selection and the query pipeline
//!
//! - Budgeted context selection from a merged retrieval result
//! - End-to-end pipeline: retrieve -> select -> generate
//!
//! # Examples
//!
//! ```rust,no_run
//! use ragweave::config::AppConfig;
//! use ragweave::rag::MemoryRagService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = MemoryRagService::from_config(&config)?;
//!
//!     service.ingest_document("notes.md", "some document text", true).await?;
//!     let answer = service.answer("What do the notes say?").await?;
//!     println!("Answer: {answer}");
//!
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod pipeline;

pub use context::ContextSelector;
pub use pipeline::MemoryRagService;
pub use pipeline::RagService;
