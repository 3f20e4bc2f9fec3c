//! Image uploads.
//!
//! `POST /api/admin/uploads` takes a multipart body with a `file` part and an
//! optional `folder` part (`products` or `media`, default `products`). The
//! image is stored under a fresh unique path and its public URL is returned;
//! the caller then saves that URL on a product or media record.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
};
use serde::Serialize;
use tracing::{info, instrument};
use vitrine_data::storage::object_path;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Folders an upload may be filed under.
const FOLDERS: [&str; 2] = ["products", "media"];

/// Build the uploads router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/uploads", post(upload))
        // Headroom for multipart framing on top of the file itself
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024))
}

/// A stored upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub path: String,
}

struct UploadedFile {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

fn check_folder(folder: &str) -> Result<&'static str> {
    FOLDERS
        .iter()
        .copied()
        .find(|allowed| *allowed == folder.trim())
        .ok_or_else(|| AppError::BadRequest(format!("unknown upload folder: {folder}")))
}

fn check_file(file: &UploadedFile) -> Result<()> {
    if file.bytes.is_empty() {
        return Err(AppError::BadRequest("file is empty".to_string()));
    }
    if file.bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::BadRequest(format!(
            "file exceeds {} MiB",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }
    if !file.content_type.starts_with("image/") {
        return Err(AppError::BadRequest(format!(
            "only images can be uploaded, got {}",
            file.content_type
        )));
    }
    Ok(())
}

/// POST /api/admin/uploads
#[instrument(skip_all, fields(admin = %admin.email))]
pub async fn upload(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    let mut folder = FOLDERS[0];
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        match field.name() {
            Some("folder") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                folder = check_folder(&value)?;
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::BadRequest("missing file part".to_string()))?;
    check_file(&file)?;

    let path = object_path(folder, &file.file_name);
    let size = file.bytes.len();
    let url = state
        .storage()
        .upload(&path, file.bytes, &file.content_type)
        .await?;

    info!(path = %path, size, content_type = %file.content_type, "Image uploaded");
    Ok((StatusCode::CREATED, Json(UploadResponse { url, path })))
}
