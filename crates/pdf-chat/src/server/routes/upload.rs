//! PDF upload endpoint

use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};

use crate::error::{Error, Result};
use crate::ingestion::{is_allowed_file, secure_filename};
use crate::server::state::AppState;
use crate::types::UploadResponse;

pub const NO_FILE_PART: &str = "No file part";
pub const NO_SELECTED_FILE: &str = "No selected file";
pub const INVALID_FILE_TYPE: &str = "Invalid file type. Only PDF files are allowed";

/// Name of the multipart field carrying the document
const FILE_FIELD: &str = "file";

/// POST /upload - Store a PDF and extract its text
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    // Not a multipart/form-data request at all
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!("Upload rejected: {}", rejection.body_text());
        Error::invalid_input(NO_FILE_PART)
    })?;

    let (original_name, data) = read_file_field(multipart, state.config().server.max_upload_size)
        .await?
        .ok_or_else(|| Error::invalid_input(NO_FILE_PART))?;

    if original_name.is_empty() {
        return Err(Error::invalid_input(NO_SELECTED_FILE));
    }
    if !is_allowed_file(&original_name) {
        return Err(Error::invalid_input(INVALID_FILE_TYPE));
    }

    let filename = secure_filename(&original_name);
    if filename.is_empty() {
        return Err(Error::invalid_input(INVALID_FILE_TYPE));
    }

    let path = state.config().server.upload_dir.join(&filename);
    tokio::fs::write(&path, &data).await?;
    tracing::info!(
        "Saved '{}' as {} ({} bytes)",
        original_name,
        path.display(),
        data.len()
    );

    let extractor = state.extractor();
    let name = filename.clone();
    let text = tokio::task::spawn_blocking(move || extractor.extract(&name, &data))
        .await
        .map_err(|e| Error::extraction(&filename, format!("extraction task failed: {}", e)))??;

    let response = UploadResponse::new(filename.clone(), &text);
    state.store().insert(filename, text);

    tracing::info!(
        "Registered '{}' ({} characters)",
        response.filename,
        response.text_length
    );

    Ok(Json(response))
}

/// Read the first `file` part, returning its client filename and bytes
async fn read_file_field(
    mut multipart: Multipart,
    max_upload_size: usize,
) -> Result<Option<(String, Bytes)>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_upload_size))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_upload_size))?;

        return Ok(Some((filename, data)));
    }

    Ok(None)
}

fn multipart_error(err: MultipartError, max_upload_size: usize) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge(format!(
            "File too large. Maximum upload size is {} bytes",
            max_upload_size
        ))
    } else {
        Error::invalid_input(format!("Failed to read upload: {}", err.body_text()))
    }
}
