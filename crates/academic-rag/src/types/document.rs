//! Document, extracted text and chunk types

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ingestion::normalize::clean_text;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_DOC: &str = "application/msword";

/// Supported document formats, detected from the declared media type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
    /// Legacy Microsoft Word document (.doc)
    Doc,
    /// Any `text/*` type or a `.txt` file
    Text,
    /// Markdown file
    Markdown,
    /// Anything else, carrying the declared media type
    Unsupported(String),
}

impl DocumentFormat {
    /// Detect the format from a MIME type, falling back to the filename
    /// extension for `.txt` and `.md` uploads with a generic media type.
    pub fn detect(media_type: &str, filename: &str) -> Self {
        let mime = media_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            MIME_PDF => return Self::Pdf,
            MIME_DOCX => return Self::Docx,
            MIME_DOC => return Self::Doc,
            "text/markdown" | "text/x-markdown" => return Self::Markdown,
            m if m.starts_with("text/") => return Self::Text,
            _ => {}
        }

        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".md") {
            Self::Markdown
        } else if lower.ends_with(".txt") {
            Self::Text
        } else {
            Self::Unsupported(media_type.to_string())
        }
    }

    /// Whether this format has an extraction path
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }

    /// Get display name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "Word Document (.docx)",
            Self::Doc => "Word Document (.doc)",
            Self::Text => "Text File",
            Self::Markdown => "Markdown",
            Self::Unsupported(_) => "Unsupported",
        }
    }
}

/// A file received from an upload, owned by the ingestion pipeline
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original filename as uploaded by user (not guaranteed unique)
    pub filename: String,
    /// Declared media type
    pub media_type: String,
    /// Raw content
    pub bytes: Bytes,
    /// Size in bytes as reported by the transport
    pub size: u64,
    /// Where a copy of the upload was kept, if anywhere
    pub retained_path: Option<String>,
}

impl UploadedFile {
    /// Create an upload from its parts; `size` is taken from the content
    pub fn new(
        filename: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            filename: filename.into(),
            media_type: media_type.into(),
            size: bytes.len() as u64,
            bytes,
            retained_path: None,
        }
    }

    /// Record where a copy of the upload was written
    pub fn with_retained_path(mut self, path: impl Into<String>) -> Self {
        self.retained_path = Some(path.into());
        self
    }

    /// Detected document format
    pub fn format(&self) -> DocumentFormat {
        DocumentFormat::detect(&self.media_type, &self.filename)
    }
}

/// Normalized plain text of one document. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    /// Normalize raw text; fails with `EmptyDocument` if nothing usable remains
    pub fn normalize(raw: &str, filename: &str) -> Result<Self> {
        let cleaned = clean_text(raw);
        if cleaned.is_empty() {
            return Err(Error::empty_document(filename));
        }
        Ok(Self(cleaned))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Number of whitespace-delimited words
    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }
}

impl AsRef<str> for ExtractedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A word-window slice of a document, tagged with its source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk text
    pub content: String,
    /// Source filename
    pub filename: String,
}

impl Chunk {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            filename: filename.into(),
        }
    }
}

/// A chunk returned by the similarity-search service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Chunk text
    pub content: String,
    /// Source filename
    pub filename: String,
    /// Relevance score, when the service reports one
    #[serde(default, alias = "similarity", skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl RetrievedChunk {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            filename: filename.into(),
            score: None,
        }
    }
}
