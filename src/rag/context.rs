//! Context selection: budget ceiling and coherence sort

use tracing::debug;

use crate::config::AppConfig;
use crate::models::Chunk;

/// Selects the prefix of a merged retrieval result that fits the
/// character budget, optionally re-sorting it for reading coherence.
pub struct ContextSelector {
    max_content: usize,
    sort_by_source_and_index: bool,
}

impl ContextSelector {
    /// Create a new context selector
    #[must_use]
    pub const fn new(max_content: usize, sort_by_source_and_index: bool) -> Self {
        Self {
            max_content,
            sort_by_source_and_index,
        }
    }

    /// Create a selector from application configuration
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.max_content(), config.sort_by_source_and_index())
    }

    /// Get the configured character budget
    #[must_use]
    pub const fn max_content(&self) -> usize {
        self.max_content
    }

    /// Truncate the merged list to the character budget, then apply
    /// the optional coherence sort.
    ///
    /// The budget is a hard ceiling: accumulation stops before the
    /// chunk that would cross it, chunks are never split. A first
    /// chunk longer than the whole budget yields an empty bundle.
    /// The sort happens after truncation, so it only affects
    /// presentation order, never which chunks are included.
    #[must_use]
    pub fn select(&self, merged: Vec<Chunk>) -> Vec<Chunk> {
        let mut selected = Vec::new();
        let mut total_length = 0;

        for chunk in merged {
            if total_length + chunk.text.len() > self.max_content {
                break;
            }
            total_length += chunk.text.len();
            selected.push(chunk);
        }

        debug!(
            "Selected {} chunks ({total_length}/{} chars)",
            selected.len(),
            self.max_content
        );

        if self.sort_by_source_and_index {
            // Stable, so chunks with equal keys keep retrieval order
            selected.sort_by(|a, b| a.key.cmp(&b.key));
        }

        selected
    }
}
