//! Prompt construction for answer synthesis and title extraction

use crate::models::Chunk;
use crate::models::MetaValue;
use crate::models::META_TITLE;

/// Build the question-answering prompt from the selected context
/// chunks and the user's question.
#[must_use]
pub fn build_qa_prompt(question: &str, chunks: &[Chunk]) -> String {
    let mut context = String::new();
    for (idx, chunk) in chunks.iter().enumerate() {
        context.push_str(&format!("\n[Document {}] (source: {})\n", idx + 1, chunk.key));
        if let Some(title) = chunk.metadata.get(META_TITLE).and_then(MetaValue::as_str) {
            if !title.is_empty() {
                context.push_str(&format!("Title: {title}\n"));
            }
        }
        context.push_str(&chunk.text);
        context.push('\n');
    }

    format!(
        r"You are an expert assistant answering questions from a document knowledge base.

Context: The following document excerpts may be relevant to the question:
{context}

Question: {question}

Instructions:
1. Provide a helpful and accurate answer based on the excerpts above
2. If referencing a specific excerpt, mention its source
3. If the excerpts don't contain relevant information, say so
4. Be concise but informative

Answer:"
    )
}

/// Build the prompt used to extract a short title for a document.
/// Only the head of the document is sent.
#[must_use]
pub fn build_title_prompt(text: &str) -> String {
    let head: String = text.chars().take(2000).collect();
    format!(
        r"Extract a short, descriptive title for the following document. Respond with the title only, no quotes and no explanation.

Document:
{head}

Title:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qa_prompt_includes_chunks_and_question() {
        let chunks = vec![
            Chunk::new("report.pdf", 0, "revenue grew by 12 percent"),
            Chunk::new("report.pdf", 1, "costs were flat year over year"),
        ];
        let prompt = build_qa_prompt("How did revenue change?", &chunks);
        assert!(prompt.contains("revenue grew by 12 percent"));
        assert!(prompt.contains("costs were flat"));
        assert!(prompt.contains("How did revenue change?"));
        assert!(prompt.contains("report.pdf#0"));
    }

    #[test]
    fn test_qa_prompt_includes_title_metadata() {
        let chunks =
            vec![Chunk::new("a.txt", 0, "body").with_metadata(META_TITLE, "Annual Report")];
        let prompt = build_qa_prompt("q", &chunks);
        assert!(prompt.contains("Title: Annual Report"));
    }

    #[test]
    fn test_title_prompt_truncates_long_documents() {
        let text = "x".repeat(10_000);
        let prompt = build_title_prompt(&text);
        assert!(prompt.len() < 2500);
    }
}
