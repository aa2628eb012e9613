//! Response types for ingestion and queries

use serde::{Deserialize, Serialize};

use super::document::RetrievedChunk;

/// Successfully ingested document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentSummary {
    /// Original filename
    pub name: String,
    /// File size in bytes
    pub size: u64,
    /// Declared media type
    #[serde(rename = "type")]
    pub media_type: String,
    /// Chunks accepted by the index service
    pub chunks_indexed: usize,
    /// Where the upload was retained, if retention is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Ingestion error for a specific file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestError {
    /// Filename that failed
    pub filename: String,
    /// Machine-readable error type
    pub kind: String,
    /// Error message
    pub error: String,
}

impl IngestError {
    pub fn from_error(filename: impl Into<String>, err: &crate::error::Error) -> Self {
        Self {
            filename: filename.into(),
            kind: err.kind().to_string(),
            error: err.to_string(),
        }
    }
}

/// Result of ingesting one upload batch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestReport {
    /// True when at least one document was indexed
    pub success: bool,
    /// Documents that were processed and indexed
    pub files: Vec<DocumentSummary>,
    /// Per-file failures
    #[serde(default)]
    pub errors: Vec<IngestError>,
    /// Human-readable summary
    pub message: String,
}

impl IngestReport {
    /// Assemble a report from per-file outcomes
    pub fn new(files: Vec<DocumentSummary>, errors: Vec<IngestError>) -> Self {
        Self {
            success: !files.is_empty(),
            message: format!("{} document(s) processed and indexed", files.len()),
            files,
            errors,
        }
    }

    /// Total chunks indexed across the batch
    pub fn total_chunks(&self) -> usize {
        self.files.iter().map(|f| f.chunks_indexed).sum()
    }
}

/// Answer produced by the query pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryOutcome {
    /// Generated answer text
    pub answer: String,
    /// Chunks the answer was grounded on (empty for ungrounded answers)
    pub sources: Vec<RetrievedChunk>,
}

impl QueryOutcome {
    /// True when no context was available to the model
    pub fn is_ungrounded(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Chat-facing result of a query, with failures already folded in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryReply {
    /// The model answered
    Answered(String),
    /// The query was blank; nothing was retrieved or generated
    Rejected,
    /// Retrieval or generation failed and the cause was logged
    Fallback,
}

impl QueryReply {
    /// Text shown to the user, `None` for a rejected query
    pub fn text(&self) -> Option<&str> {
        match self {
            QueryReply::Answered(answer) => Some(answer),
            QueryReply::Rejected => None,
            QueryReply::Fallback => Some(crate::error::FALLBACK_ANSWER),
        }
    }
}
