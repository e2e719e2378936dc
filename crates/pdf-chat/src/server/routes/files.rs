//! Document listing endpoint

use axum::{extract::State, Json};

use crate::server::state::AppState;
use crate::types::FileListResponse;

/// GET /files - Filenames with extracted text
pub async fn list_files(State(state): State<AppState>) -> Json<FileListResponse> {
    Json(FileListResponse {
        files: state.store().filenames(),
    })
}
