//! Query request types

use serde::{Deserialize, Serialize};

/// Metadata of a previously uploaded file, echoed back by clients
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileHint {
    /// Original filename
    pub name: String,
    /// Size in bytes
    #[serde(default)]
    pub size: Option<u64>,
    /// Declared media type
    #[serde(default, rename = "type")]
    pub media_type: Option<String>,
}

/// Question against the uploaded corpus
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question to answer
    #[serde(default)]
    pub query: String,

    /// Filenames the client considers relevant (not used to filter retrieval)
    #[serde(default)]
    pub context: Vec<String>,

    /// Metadata of the client's uploaded files (not used to filter retrieval)
    #[serde(default)]
    pub files: Vec<FileHint>,
}

impl QueryRequest {
    /// Create a new query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Attach context hints
    pub fn with_context(mut self, filenames: Vec<String>) -> Self {
        self.context = filenames;
        self
    }

    /// Attach file metadata hints
    pub fn with_files(mut self, files: Vec<FileHint>) -> Self {
        self.files = files;
        self
    }

    /// True if the query has no non-whitespace content
    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }
}
