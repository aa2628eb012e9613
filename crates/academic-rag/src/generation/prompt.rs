//! Prompt templates for RAG generation

use crate::types::RetrievedChunk;

/// Context shown to the model when retrieval returned nothing
pub const NO_CONTEXT_PLACEHOLDER: &str = "No uploaded documents available for context.";

/// Prompt builder for academic RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Render retrieved chunks as numbered sources, in retrieval order
    pub fn build_context(chunks: &[RetrievedChunk]) -> String {
        if chunks.is_empty() {
            return NO_CONTEXT_PLACEHOLDER.to_string();
        }

        chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| format!("[Source {} - {}]: {}", i + 1, chunk.filename, chunk.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build the full prompt for a query and its retrieved chunks
    pub fn build(query: &str, chunks: &[RetrievedChunk]) -> String {
        Self::build_with_context(query, &Self::build_context(chunks))
    }

    /// Build the full prompt from an already rendered context block
    pub fn build_with_context(query: &str, context: &str) -> String {
        format!(
            r#"You are an academically rigorous AI assistant specializing in providing precise, well-reasoned responses based on provided documents. Your responses should be:

1. Academically precise and formal in tone
2. Evidence-based, citing specific information from the provided context
3. Clear and well-structured
4. Objective and unbiased
5. Comprehensive yet concise

CONTEXT FROM UPLOADED DOCUMENTS:
{context}

USER QUERY:
{query}

INSTRUCTIONS:
- Analyze the provided context carefully
- Answer the query using information from the context
- If the context doesn't contain sufficient information, acknowledge this limitation
- Cite specific sources when making claims
- Maintain academic rigor and precision
- Use formal academic language
- Do NOT use asterisks or markdown formatting.

RESPONSE:"#,
            context = context,
            query = query,
        )
    }
}
