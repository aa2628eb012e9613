//! Format-aware text extraction

use std::panic::{self, AssertUnwindSafe};

use crate::error::{Error, Result};
use crate::types::{DocumentFormat, ExtractedText};

/// Extracts normalized plain text from uploaded documents
pub struct FileParser;

impl FileParser {
    /// Extract and normalize the text of a document.
    ///
    /// The format is chosen from `media_type` (see [`DocumentFormat::detect`]).
    /// Parse failures yield `ExtractionFailed`; documents without usable text
    /// (including unsupported formats) yield `EmptyDocument`.
    pub fn extract(data: &[u8], media_type: &str, filename: &str) -> Result<ExtractedText> {
        let format = DocumentFormat::detect(media_type, filename);
        let raw = Self::extract_raw(data, &format, filename)?;
        let text = ExtractedText::normalize(&raw, filename)?;

        tracing::debug!(
            "Extracted {} words from {} ({})",
            text.word_count(),
            filename,
            format.display_name()
        );

        Ok(text)
    }

    /// Raw text for a detected format, before normalization
    pub fn extract_raw(data: &[u8], format: &DocumentFormat, filename: &str) -> Result<String> {
        match format {
            DocumentFormat::Pdf => Self::parse_pdf(data, filename),
            DocumentFormat::Docx | DocumentFormat::Doc => Self::parse_docx(data, filename),
            DocumentFormat::Text | DocumentFormat::Markdown => Ok(Self::parse_text(data)),
            DocumentFormat::Unsupported(media_type) => {
                tracing::warn!(
                    "No extractor for {} ({}), treating as empty",
                    filename,
                    media_type
                );
                Ok(String::new())
            }
        }
    }

    /// Parse PDF document.
    ///
    /// pdf-extract panics on some malformed font dictionaries; those panics
    /// are caught and reported as extraction failures.
    fn parse_pdf(data: &[u8], filename: &str) -> Result<String> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(data)
        }));

        match outcome {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => {
                tracing::warn!("pdf-extract failed for {}: {}", filename, e);
                Err(Error::extraction(filename, e.to_string()))
            }
            Err(_) => {
                tracing::warn!("pdf-extract panicked on {}", filename);
                Err(Error::extraction(filename, "PDF parser panicked"))
            }
        }
    }

    /// Parse Word document paragraph by paragraph
    fn parse_docx(data: &[u8], filename: &str) -> Result<String> {
        let doc = docx_rs::read_docx(data).map_err(|e| Error::extraction(filename, e.to_string()))?;

        let mut content = String::new();
        for child in doc.document.children {
            if let docx_rs::DocumentChild::Paragraph(p) = child {
                for child in p.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for child in run.children {
                            if let docx_rs::RunChild::Text(t) = child {
                                content.push_str(&t.text);
                            }
                        }
                    }
                }
                content.push('\n');
            }
        }

        Ok(content)
    }

    /// Plain text or markdown, decoded as UTF-8
    fn parse_text(data: &[u8]) -> String {
        String::from_utf8_lossy(data).into_owned()
    }
}
