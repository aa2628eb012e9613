//! Application state for the RAG server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::generation::QueryPipeline;
use crate::ingestion::IngestPipeline;
use crate::providers::{GeminiClient, LlmProvider, RemoteIndexClient, VectorStoreProvider};

/// Shared application state, immutable after startup
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Remote similarity index
    vector_store: Arc<dyn VectorStoreProvider>,
    /// Answer generator
    llm: Arc<dyn LlmProvider>,
    /// Upload processing
    ingest: IngestPipeline,
    /// Question answering
    query: QueryPipeline,
}

impl AppState {
    /// Create application state with HTTP clients built from configuration
    pub fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing RAG application state...");

        let vector_store: Arc<dyn VectorStoreProvider> =
            Arc::new(RemoteIndexClient::new(&config.retrieval)?);
        tracing::info!("Index service client ready ({})", config.retrieval.base_url);

        let llm: Arc<dyn LlmProvider> = Arc::new(GeminiClient::new(&config.generation)?);
        tracing::info!("Gemini client ready (model: {})", config.generation.model);

        Self::with_providers(config, vector_store, llm)
    }

    /// Create application state around existing providers
    pub fn with_providers(
        config: RagConfig,
        vector_store: Arc<dyn VectorStoreProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Result<Self> {
        config.validate()?;

        let ingest = IngestPipeline::from_config(Arc::clone(&vector_store), &config)?;
        let query = QueryPipeline::from_config(Arc::clone(&vector_store), Arc::clone(&llm), &config);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                vector_store,
                llm,
                ingest,
                query,
            }),
        })
    }

    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    pub fn vector_store(&self) -> &Arc<dyn VectorStoreProvider> {
        &self.inner.vector_store
    }

    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.inner.llm
    }

    pub fn ingest(&self) -> &IngestPipeline {
        &self.inner.ingest
    }

    pub fn query(&self) -> &QueryPipeline {
        &self.inner.query
    }
}
