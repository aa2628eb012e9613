//! HTTP client for the remote similarity-search service
//!
//! The service owns embedding and storage. It exposes:
//! - `POST /add` `{chunks, filename}` -> `{chunks_added}`
//! - `POST /search` `{query, top_k}` -> `[{content, filename, similarity}]`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::RetrievalConfig;
use crate::error::{Error, Result};
use crate::providers::vector_store::VectorStoreProvider;
use crate::types::{Chunk, RetrievedChunk};

/// Client for a remote vector index
pub struct RemoteIndexClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct AddRequest<'a> {
    chunks: Vec<&'a str>,
    filename: &'a str,
}

#[derive(Deserialize)]
struct AddResponse {
    chunks_added: usize,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    top_k: usize,
}

impl RemoteIndexClient {
    /// Create a new client from retrieval configuration
    pub fn new(config: &RetrievalConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn add_group(&self, filename: &str, group: &[Chunk]) -> Result<usize> {
        tracing::debug!("Indexing {} chunks from {}", group.len(), filename);

        let request = AddRequest {
            chunks: group.iter().map(|c| c.content.as_str()).collect(),
            filename,
        };

        let response = self
            .client
            .post(self.endpoint("add"))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::indexing(filename, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::indexing(
                filename,
                format!("index service returned {}: {}", status, body),
            ));
        }

        let added: AddResponse = response
            .json()
            .await
            .map_err(|e| Error::indexing(filename, format!("invalid response: {}", e)))?;

        Ok(added.chunks_added)
    }

    async fn try_search(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedChunk>> {
        let response = self
            .client
            .post(self.endpoint("search"))
            .json(&SearchRequest { query, top_k })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::internal(format!(
                "search returned {}: {}",
                status, body
            )));
        }

        let mut results: Vec<RetrievedChunk> = response.json().await?;
        results.truncate(top_k);
        Ok(results)
    }
}

#[async_trait]
impl VectorStoreProvider for RemoteIndexClient {
    async fn add_chunks(&self, chunks: &[Chunk]) -> Result<usize> {
        let mut total = 0;
        // The service takes one filename per request
        for group in chunks.chunk_by(|a, b| a.filename == b.filename) {
            total += self.add_group(&group[0].filename, group).await?;
        }
        Ok(total)
    }

    async fn search(&self, query: &str, top_k: usize) -> Vec<RetrievedChunk> {
        match self.try_search(query, top_k).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("Retrieval failed, continuing without context: {}", e);
                Vec::new()
            }
        }
    }

    async fn health_check(&self) -> bool {
        match self.client.get(self.endpoint("docs")).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Index service health check failed: {}", e);
                false
            }
        }
    }

    fn name(&self) -> &str {
        "remote-index"
    }
}
