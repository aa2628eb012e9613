//! Query orchestration: retrieve, assemble prompt, generate

use std::sync::Arc;
use std::time::Instant;

use crate::config::{GenerationConfig, RagConfig};
use crate::error::{Error, Result};
use crate::generation::prompt::PromptBuilder;
use crate::providers::{LlmProvider, VectorStoreProvider};
use crate::types::{QueryOutcome, QueryReply, QueryRequest};

/// Answers questions against the indexed corpus
#[derive(Clone)]
pub struct QueryPipeline {
    vector_store: Arc<dyn VectorStoreProvider>,
    llm: Arc<dyn LlmProvider>,
    top_k: usize,
    params: GenerationConfig,
}

impl QueryPipeline {
    pub fn new(
        vector_store: Arc<dyn VectorStoreProvider>,
        llm: Arc<dyn LlmProvider>,
        top_k: usize,
        params: GenerationConfig,
    ) -> Self {
        Self {
            vector_store,
            llm,
            top_k,
            params,
        }
    }

    /// Create a pipeline using the retrieval and generation settings of `config`
    pub fn from_config(
        vector_store: Arc<dyn VectorStoreProvider>,
        llm: Arc<dyn LlmProvider>,
        config: &RagConfig,
    ) -> Self {
        Self::new(
            vector_store,
            llm,
            config.retrieval.top_k,
            config.generation.params,
        )
    }

    /// Answer a query.
    ///
    /// Blank queries fail with `InvalidQuery` before any I/O. Retrieval never
    /// fails; with no results the model is prompted without context.
    pub async fn answer(&self, request: &QueryRequest) -> Result<QueryOutcome> {
        if request.is_blank() {
            return Err(Error::InvalidQuery);
        }

        let start = Instant::now();
        let query = request.query.as_str();

        if !request.context.is_empty() || !request.files.is_empty() {
            tracing::debug!(
                "Query carries {} context hints and {} file hints; retrieval stays global",
                request.context.len(),
                request.files.len()
            );
        }

        let sources = self.vector_store.search(query, self.top_k).await;
        if sources.is_empty() {
            tracing::warn!("No context retrieved, generating ungrounded answer");
        }

        let prompt = PromptBuilder::build(query, &sources);
        let answer = self.llm.generate(&prompt, &self.params).await?;

        tracing::info!(
            "Answered query with {} sources via {} in {}ms",
            sources.len(),
            self.llm.model(),
            start.elapsed().as_millis()
        );

        Ok(QueryOutcome { answer, sources })
    }

    /// Answer a query for display. Any failure other than a blank query
    /// becomes [`QueryReply::Fallback`] after the cause is logged.
    pub async fn respond(&self, request: &QueryRequest) -> QueryReply {
        match self.answer(request).await {
            Ok(outcome) => QueryReply::Answered(outcome.answer),
            Err(Error::InvalidQuery) => QueryReply::Rejected,
            Err(e) => {
                tracing::error!("Query failed: {}", e);
                QueryReply::Fallback
            }
        }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::*;
    use super::*;
    use crate::generation::prompt::NO_CONTEXT_PLACEHOLDER;
    use crate::types::RetrievedChunk;

    fn pipeline(index: Arc<FakeIndex>, llm: Arc<FakeLlm>) -> QueryPipeline {
        QueryPipeline::new(index, llm, 5, GenerationConfig::default())
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected_without_io() {
        let index = Arc::new(FakeIndex::default());
        let llm = Arc::new(FakeLlm::answering("unused"));
        let pipeline = pipeline(index.clone(), llm.clone());

        let err = pipeline.answer(&QueryRequest::new("   ")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidQuery));
        assert!(index.searches.lock().unwrap().is_empty());
        assert!(llm.prompts.lock().unwrap().is_empty());

        assert_eq!(
            pipeline.respond(&QueryRequest::new("")).await,
            QueryReply::Rejected
        );
        assert!(index.searches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_grounded_answer() {
        let index = Arc::new(FakeIndex {
            results: vec![
                RetrievedChunk::new("notes.txt", "Alpha is the first letter."),
                RetrievedChunk::new("greek.pdf", "Beta follows alpha."),
            ],
            ..Default::default()
        });
        let llm = Arc::new(FakeLlm::answering("Alpha is the first letter [Source 1]."));
        let pipeline = pipeline(index.clone(), llm.clone());

        let outcome = pipeline
            .answer(&QueryRequest::new("What is alpha?"))
            .await
            .unwrap();

        assert_eq!(outcome.answer, "Alpha is the first letter [Source 1].");
        assert_eq!(outcome.sources.len(), 2);
        assert!(!outcome.is_ungrounded());
        assert_eq!(
            index.searches.lock().unwrap()[0],
            ("What is alpha?".to_string(), 5)
        );

        let prompts = llm.prompts.lock().unwrap();
        let first = prompts[0].find("[Source 1 - notes.txt]").unwrap();
        let second = prompts[0].find("[Source 2 - greek.pdf]").unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn test_empty_retrieval_still_generates() {
        let index = Arc::new(FakeIndex::default());
        let llm = Arc::new(FakeLlm::answering("No documents were provided."));
        let pipeline = pipeline(index, llm.clone());

        let outcome = pipeline
            .answer(&QueryRequest::new("What is alpha?"))
            .await
            .unwrap();

        assert!(outcome.is_ungrounded());
        assert!(llm.prompts.lock().unwrap()[0].contains(NO_CONTEXT_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_generation_failure_maps_to_fallback() {
        let index = Arc::new(FakeIndex::default());
        let llm = Arc::new(FakeLlm::failing());
        let pipeline = pipeline(index, llm);

        let request = QueryRequest::new("What is alpha?");
        assert!(matches!(
            pipeline.answer(&request).await,
            Err(Error::GenerationFailed(_))
        ));
        assert_eq!(pipeline.respond(&request).await, QueryReply::Fallback);
    }

    #[tokio::test]
    async fn test_respond_passes_answer_through() {
        let index = Arc::new(FakeIndex::default());
        let llm = Arc::new(FakeLlm::answering("Alpha comes first."));
        let pipeline = pipeline(index, llm);

        let reply = pipeline.respond(&QueryRequest::new("What is alpha?")).await;
        assert_eq!(reply, QueryReply::Answered("Alpha comes first.".to_string()));
        assert_eq!(reply.text(), Some("Alpha comes first."));
    }

    #[tokio::test]
    async fn test_hints_do_not_filter_retrieval() {
        let index = Arc::new(FakeIndex {
            results: vec![RetrievedChunk::new("other.txt", "unrelated file")],
            ..Default::default()
        });
        let llm = Arc::new(FakeLlm::answering("ok"));
        let pipeline = pipeline(index, llm);

        let request = QueryRequest::new("q").with_context(vec!["notes.txt".to_string()]);
        let outcome = pipeline.answer(&request).await.unwrap();
        assert_eq!(outcome.sources[0].filename, "other.txt");
    }
}
