//! Ingestion orchestration: extract, chunk and index uploaded documents

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::ingestion::chunker::WordChunker;
use crate::ingestion::parser::FileParser;
use crate::providers::VectorStoreProvider;
use crate::types::{Chunk, DocumentSummary, ExtractedText, IngestError, IngestReport, UploadedFile};

/// Turns uploaded documents into indexed chunks
#[derive(Clone)]
pub struct IngestPipeline {
    vector_store: Arc<dyn VectorStoreProvider>,
    chunker: WordChunker,
    parallel_documents: usize,
}

impl IngestPipeline {
    pub fn new(
        vector_store: Arc<dyn VectorStoreProvider>,
        chunker: WordChunker,
        parallel_documents: usize,
    ) -> Self {
        Self {
            vector_store,
            chunker,
            parallel_documents: parallel_documents.max(1),
        }
    }

    /// Create a pipeline from configuration. Fails on invalid chunking parameters.
    pub fn from_config(vector_store: Arc<dyn VectorStoreProvider>, config: &RagConfig) -> Result<Self> {
        Ok(Self::new(
            vector_store,
            WordChunker::from_config(&config.chunking)?,
            config.processing.parallel_documents,
        ))
    }

    /// Extract text off the async runtime; PDF parsing is CPU-bound
    async fn extract(file: &UploadedFile) -> Result<ExtractedText> {
        let data = file.bytes.clone();
        let media_type = file.media_type.clone();
        let filename = file.filename.clone();

        tokio::task::spawn_blocking(move || FileParser::extract(&data, &media_type, &filename))
            .await
            .map_err(|e| Error::extraction(&file.filename, format!("extraction task failed: {}", e)))?
    }

    /// Process a single document end to end
    pub async fn ingest_document(&self, file: UploadedFile) -> Result<DocumentSummary> {
        let start = Instant::now();
        tracing::info!("Processing file: {} ({})", file.filename, file.media_type);

        let text = Self::extract(&file).await?;
        let chunks: Vec<Chunk> = self
            .chunker
            .chunks(text.as_str())
            .map(|content| Chunk::new(file.filename.as_str(), content))
            .collect();

        let chunks_indexed = if chunks.is_empty() {
            tracing::warn!("No chunks produced for {}, nothing to index", file.filename);
            0
        } else {
            self.vector_store.add_chunks(&chunks).await?
        };

        tracing::info!(
            "Indexed {}: {} words, {} chunks in {}ms",
            file.filename,
            text.word_count(),
            chunks_indexed,
            start.elapsed().as_millis()
        );

        Ok(DocumentSummary {
            name: file.filename,
            size: file.size,
            media_type: file.media_type,
            chunks_indexed,
            path: file.retained_path,
        })
    }

    /// Process every document of an upload independently, preserving order
    pub async fn ingest_batch(&self, files: Vec<UploadedFile>) -> IngestReport {
        let outcomes: Vec<(String, Result<DocumentSummary>)> = stream::iter(files)
            .map(|file| async move {
                let filename = file.filename.clone();
                (filename, self.ingest_document(file).await)
            })
            .buffered(self.parallel_documents)
            .collect()
            .await;

        let mut documents = Vec::new();
        let mut errors = Vec::new();
        for (filename, outcome) in outcomes {
            match outcome {
                Ok(summary) => documents.push(summary),
                Err(e) => {
                    tracing::error!("Failed to ingest {}: {}", filename, e);
                    errors.push(IngestError::from_error(filename, &e));
                }
            }
        }

        IngestReport::new(documents, errors)
    }

    pub fn chunker(&self) -> &WordChunker {
        &self.chunker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::pipeline::fakes::FakeIndex;
    use crate::ingestion::parser::fixtures::docx_with_paragraphs;
    use crate::types::document::MIME_DOCX;

    fn pipeline(index: Arc<FakeIndex>, chunk_size: usize, overlap: usize) -> IngestPipeline {
        IngestPipeline::new(index, WordChunker::new(chunk_size, overlap).unwrap(), 1)
    }

    #[tokio::test]
    async fn test_ingest_text_document() {
        let index = Arc::new(FakeIndex::default());
        let pipeline = pipeline(index.clone(), 1000, 200);

        let summary = pipeline
            .ingest_document(UploadedFile::new(
                "notes.txt",
                "text/plain",
                "Alpha is the first letter.",
            ))
            .await
            .unwrap();

        assert_eq!(summary.name, "notes.txt");
        assert_eq!(summary.size, 26);
        assert_eq!(summary.chunks_indexed, 1);

        let added = index.added.lock().unwrap();
        assert_eq!(
            added[0],
            vec![Chunk::new("notes.txt", "Alpha is the first letter.")]
        );
    }

    #[tokio::test]
    async fn test_ingest_chunks_long_document() {
        let index = Arc::new(FakeIndex::default());
        let pipeline = pipeline(index.clone(), 10, 2);

        let text = (0..30).map(|i| format!("word{}", i)).collect::<Vec<_>>().join(" ");
        let summary = pipeline
            .ingest_document(UploadedFile::new("long.md", "text/markdown", text))
            .await
            .unwrap();

        // 30 words, step 8
        assert_eq!(summary.chunks_indexed, 4);

        let added = index.added.lock().unwrap();
        assert_eq!(added.len(), 1);
        assert!(added[0].iter().all(|c| c.filename == "long.md"));
        assert_eq!(added[0][3].content, "word24 word25 word26 word27 word28 word29");
    }

    #[tokio::test]
    async fn test_ingest_docx() {
        let index = Arc::new(FakeIndex::default());
        let pipeline = pipeline(index.clone(), 1000, 200);

        let data = docx_with_paragraphs(&["Mitochondria produce ATP."]);
        let summary = pipeline
            .ingest_document(UploadedFile::new("bio.docx", MIME_DOCX, data))
            .await
            .unwrap();
        assert_eq!(summary.chunks_indexed, 1);
    }

    #[tokio::test]
    async fn test_empty_document_is_not_indexed() {
        let index = Arc::new(FakeIndex::default());
        let pipeline = pipeline(index.clone(), 1000, 200);

        let err = pipeline
            .ingest_document(UploadedFile::new("empty.txt", "text/plain", Vec::new()))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::EmptyDocument { .. }));
        assert!(index.added.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_indexing_failure_is_reported() {
        let index = Arc::new(FakeIndex {
            fail_add: true,
            ..Default::default()
        });
        let pipeline = pipeline(index, 1000, 200);

        let err = pipeline
            .ingest_document(UploadedFile::new("notes.txt", "text/plain", "alpha"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::IndexingFailed { .. }));
    }

    #[tokio::test]
    async fn test_batch_isolates_failures_and_keeps_order() {
        let index = Arc::new(FakeIndex::default());
        let pipeline = IngestPipeline::new(index.clone(), WordChunker::default(), 3);

        let report = pipeline
            .ingest_batch(vec![
                UploadedFile::new("a.txt", "text/plain", "first document"),
                UploadedFile::new("blank.txt", "text/plain", "   "),
                UploadedFile::new("b.txt", "text/plain", "second document"),
                UploadedFile::new("broken.pdf", "application/pdf", "not a pdf"),
            ])
            .await;

        assert!(report.success);
        assert_eq!(report.message, "2 document(s) processed and indexed");
        let names: Vec<&str> = report.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);

        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[0].filename, "blank.txt");
        assert_eq!(report.errors[0].kind, "empty_document");
        assert_eq!(report.errors[1].filename, "broken.pdf");
        assert_eq!(report.errors[1].kind, "extraction_failed");
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let pipeline = IngestPipeline::new(Arc::new(FakeIndex::default()), WordChunker::default(), 1);
        let report = pipeline.ingest_batch(Vec::new()).await;
        assert!(!report.success);
        assert_eq!(report.message, "0 document(s) processed and indexed");
    }
}
