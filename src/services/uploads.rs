//! Stored-file handling for multipart uploads.
//!
//! Files land on local disk under the configured uploads root and are
//! served back under `/uploads`. Responses carry absolute URLs built from
//! the request's own Host header.

use std::path::Path;

use axum::http::{header, HeaderMap};

use crate::config::CONFIG;
use crate::error::{AppError, Result};

/// Image types accepted for profile pictures.
const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

/// Which upload directory a file belongs to.
#[derive(Debug, Clone, Copy)]
pub enum UploadKind {
    Profile,
    Document,
}

impl UploadKind {
    fn dir(&self) -> std::path::PathBuf {
        match self {
            UploadKind::Profile => CONFIG.uploads.profile_dir(),
            UploadKind::Document => CONFIG.uploads.documents_dir(),
        }
    }

    fn url_prefix(&self) -> &'static str {
        match self {
            UploadKind::Profile => "uploads/profile",
            UploadKind::Document => "uploads/documents",
        }
    }
}

/// Reject non-image payloads for profile pictures.
pub fn require_image(content_type: Option<&str>) -> Result<()> {
    match content_type {
        Some(ct) if ALLOWED_IMAGE_TYPES.contains(&ct) => Ok(()),
        _ => Err(AppError::BadRequest(
            "Only JPEG, JPG, PNG allowed".to_string(),
        )),
    }
}

/// Write an uploaded file to disk under a collision-free name and return
/// the relative path stored in the database.
pub async fn save_upload(kind: UploadKind, original_name: &str, data: &[u8]) -> Result<String> {
    if data.is_empty() {
        return Err(AppError::BadRequest("File is required".to_string()));
    }
    if data.len() > CONFIG.uploads.max_upload_bytes {
        return Err(AppError::BadRequest("File too large".to_string()));
    }

    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bin");
    let filename = format!("{}.{}", uuid::Uuid::new_v4(), ext);

    let dir = kind.dir();
    tokio::fs::create_dir_all(&dir).await?;
    tokio::fs::write(dir.join(&filename), data).await?;

    Ok(format!("{}/{}", kind.url_prefix(), filename))
}

/// Build an absolute URL for a stored path from the request's Host header.
pub fn public_url(headers: &HeaderMap, path: &str) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");

    format!("{}://{}/{}", scheme, host, path.trim_start_matches('/'))
}

/// Absolute URL of a user's profile picture, with the default image when
/// none is stored.
pub fn profile_picture_url(headers: &HeaderMap, stored: Option<&str>) -> String {
    match stored {
        Some(path) => public_url(headers, path),
        None => public_url(headers, "uploads/profile/default.png"),
    }
}
