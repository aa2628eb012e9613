//! Core types for the RAG system

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, DocumentFormat, ExtractedText, RetrievedChunk, UploadedFile};
pub use query::{FileHint, QueryRequest};
pub use response::{DocumentSummary, IngestError, IngestReport, QueryOutcome, QueryReply};
