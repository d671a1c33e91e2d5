//! Answer synthesis boundary: the language model collaborator
//!
//! Treated as a black box with a defined call contract
//! (`generate(prompt) -> text`); failures here are surfaced as
//! [`RagweaveError::GenerationError`](crate::errors::RagweaveError)
//! and absorbed into the answer payload at the pipeline level.

pub mod client;
pub mod prompts;

pub use client::LlmClient;
pub use prompts::build_qa_prompt;
pub use prompts::build_title_prompt;
