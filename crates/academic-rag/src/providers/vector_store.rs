//! Vector store provider trait for indexing and searching chunks

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Chunk, RetrievedChunk};

/// Trait for the similarity-search service that owns the vector index
///
/// Implementations:
/// - `RemoteIndexClient`: HTTP service exposing `/add` and `/search`
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Index chunks, each tagged with its source filename. Returns the number
    /// of chunks the service accepted. An empty slice returns `Ok(0)` without
    /// a call.
    async fn add_chunks(&self, chunks: &[Chunk]) -> Result<usize>;

    /// Search for the chunks most similar to `query`, best first.
    ///
    /// Never fails: an unreachable or misbehaving service yields no results.
    async fn search(&self, query: &str, top_k: usize) -> Vec<RetrievedChunk>;

    /// Check if the provider is healthy
    async fn health_check(&self) -> bool;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
