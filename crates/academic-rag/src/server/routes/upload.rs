//! Document upload endpoint

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use std::path::{Path, PathBuf};

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{DocumentFormat, IngestError, IngestReport, UploadedFile};

static ALLOWED_TYPES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"pdf|txt|doc|docx|md").expect("valid regex"));

/// POST /api/upload - Upload, extract and index documents
pub async fn upload_files(State(state): State<AppState>, mut multipart: Multipart) -> Result<Response> {
    let server = &state.config().server;
    let mut accepted = Vec::new();
    let mut errors = Vec::new();
    let mut received = 0usize;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Upload(format!("Failed to read multipart field: {}", e)))?
    {
        // Only file parts are documents
        let Some(filename) = field.file_name().map(sanitize_filename) else {
            continue;
        };
        let media_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| mime_guess::from_path(&filename).first_or_octet_stream().to_string());

        received += 1;
        if received > server.max_files_per_upload {
            return Err(Error::Upload(format!(
                "Too many files: at most {} per upload",
                server.max_files_per_upload
            )));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::Upload(format!("Failed to read {}: {}", filename, e)))?;

        tracing::debug!("Received {} ({} bytes, {})", filename, data.len(), media_type);

        if let Err(e) = check_file(server, &filename, &media_type, data.len()) {
            tracing::warn!("Rejected upload {}: {}", filename, e);
            errors.push(IngestError::from_error(&filename, &e));
            continue;
        }

        let mut file = UploadedFile::new(filename, media_type, data);
        if let Some(dir) = &server.upload_dir {
            if let Some(path) = retain_upload(dir, &file).await {
                file = file.with_retained_path(path);
            }
        }
        accepted.push(file);
    }

    if received == 0 {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No files uploaded" })),
        )
            .into_response());
    }

    let report = state.ingest().ingest_batch(accepted).await;
    tracing::info!(
        "Upload processed: {} indexed, {} failed, {} chunks",
        report.files.len(),
        errors.len() + report.errors.len(),
        report.total_chunks()
    );

    errors.extend(report.errors);
    Ok(Json(IngestReport::new(report.files, errors)).into_response())
}

/// Accept only document types under the size limit
fn check_file(server: &ServerConfig, filename: &str, media_type: &str, size: usize) -> Result<()> {
    if size > server.max_upload_size {
        return Err(Error::Upload(format!(
            "File exceeds the {} byte limit",
            server.max_upload_size
        )));
    }

    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let extension_ok = matches!(extension.as_str(), "pdf" | "txt" | "doc" | "docx" | "md");

    let media_type_ok = ALLOWED_TYPES.is_match(&media_type.to_ascii_lowercase())
        || DocumentFormat::detect(media_type, "").is_supported();

    if extension_ok && media_type_ok {
        Ok(())
    } else {
        Err(Error::Upload("Only document files are allowed".to_string()))
    }
}

/// Strip any directory components a client put in the filename
fn sanitize_filename(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string()
}

/// Unique on-disk name: `{unix_millis}-{random}-{original}`
fn retained_name(original: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let random = uuid::Uuid::new_v4().as_u128() % 1_000_000_000;
    format!("{}-{}-{}", millis, random, original)
}

/// Write a copy of the upload; failures are logged and ignored
async fn retain_upload(dir: &Path, file: &UploadedFile) -> Option<String> {
    let path: PathBuf = dir.join(retained_name(&file.filename));

    let result = async {
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, &file.bytes).await
    }
    .await;

    match result {
        Ok(()) => Some(path.display().to_string()),
        Err(e) => {
            tracing::warn!("Could not retain {} in {}: {}", file.filename, dir.display(), e);
            None
        }
    }
}
