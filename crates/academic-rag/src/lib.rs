//! academic-rag: document question answering over a remote similarity index
//!
//! Uploaded PDF, Word, text and markdown files are extracted, normalized and
//! split into overlapping word windows, then indexed by an external
//! similarity-search service. Questions retrieve the closest chunks and are
//! answered by Gemini with an academic, source-citing prompt.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod server;
pub mod types;

pub use config::{GenerationConfig, RagConfig};
pub use error::{Error, Result, FALLBACK_ANSWER};
pub use generation::{PromptBuilder, QueryPipeline};
pub use ingestion::{FileParser, IngestPipeline, WordChunker};
pub use server::RagServer;
pub use types::{
    Chunk, DocumentFormat, ExtractedText, IngestReport, QueryOutcome, QueryReply, QueryRequest,
    RetrievedChunk, UploadedFile,
};
