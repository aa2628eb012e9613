//! Document ingestion: extraction, normalization, chunking and indexing

pub mod chunker;
pub mod normalize;
mod parser;
mod processor;

pub use chunker::{chunk_text, WordChunker};
pub use normalize::clean_text;
pub use parser::FileParser;
pub use processor::IngestPipeline;
