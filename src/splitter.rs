//! Character-window text splitting for document ingestion
//!
//! Two granularities are used: parent chunks (the unit of retrieval
//! identity) and finer child chunks for the smaller-chunks strategy.

/// Fixed-size character splitter with overlap between windows
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    /// Create a splitter; overlap is clamped below the chunk size so
    /// the window always advances.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    /// Split text into windows of at most `chunk_size` characters,
    /// consecutive windows sharing `chunk_overlap` characters.
    pub fn split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }

        let step = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            let window: String = chars[start..end].iter().collect();
            let trimmed = window.trim();
            if !trimmed.is_empty() {
                chunks.push(trimmed.to_string());
            }
            if end == chars.len() {
                break;
            }
            start += step;
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_empty_text() {
        let splitter = TextSplitter::new(100, 10);
        assert!(splitter.split("").is_empty());
    }

    #[test]
    fn test_split_short_text_single_chunk() {
        let splitter = TextSplitter::new(100, 10);
        let chunks = splitter.split("hello world");
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }

    #[test]
    fn test_split_respects_chunk_size() {
        let splitter = TextSplitter::new(10, 0);
        let text = "a".repeat(25);
        let chunks = splitter.split(&text);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(chunks[2].chars().count(), 5);
    }

    #[test]
    fn test_split_overlap_repeats_tail() {
        let splitter = TextSplitter::new(4, 2);
        let chunks = splitter.split("abcdef");
        // windows: abcd, cdef
        assert_eq!(chunks, vec!["abcd".to_string(), "cdef".to_string()]);
    }

    #[test]
    fn test_split_is_char_boundary_safe() {
        let splitter = TextSplitter::new(2, 0);
        let chunks = splitter.split("日本語テキスト");
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0], "日本");
    }

    #[test]
    fn test_overlap_clamped_below_chunk_size() {
        // Would loop forever without the clamp
        let splitter = TextSplitter::new(4, 4);
        let chunks = splitter.split("abcdefgh");
        assert!(!chunks.is_empty());
    }
}
