//! Image Upload Handlers
//!
//! Images are optimized before they reach storage; the public URL of the
//! stored object is returned for use with the profile endpoints.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::processing::{optimize_image, OptimizedImage, ProcessingError};
use super::s3::S3Client;
use crate::api::{error_response, ApiResponse, AppState};
use crate::auth::AuthUser;
use crate::util::format_file_size;

/// Most files accepted by the multiple-file endpoint.
pub const MAX_FILES: usize = 5;

/// MIME types a client may declare for an upload.
const ALLOWED_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during image uploads.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Storage is not configured.
    #[error("File storage not configured")]
    NotConfigured,

    /// No file in the expected field.
    #[error("Please upload at least one image.")]
    NoFile,

    #[error("You can upload at most {max} images at once.")]
    TooManyFiles { max: usize },

    /// File too large.
    #[error("File too large (max: {max_size} bytes)")]
    TooLarge { max_size: usize },

    /// Declared type or content is not an accepted image.
    #[error("Supports only the following file types: jpeg, jpg, png, webp.")]
    InvalidType,

    /// Malformed multipart body.
    #[error("Invalid upload: {0}")]
    Multipart(String),

    #[error(transparent)]
    Processing(#[from] ProcessingError),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Worker task failed.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::NotConfigured => (StatusCode::SERVICE_UNAVAILABLE, "STORAGE_NOT_CONFIGURED"),
            Self::NoFile => (StatusCode::BAD_REQUEST, "NO_FILE"),
            Self::TooManyFiles { .. } => (StatusCode::BAD_REQUEST, "TOO_MANY_FILES"),
            Self::TooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE"),
            Self::InvalidType => (StatusCode::BAD_REQUEST, "INVALID_FILE_TYPE"),
            Self::Multipart(_) => (StatusCode::BAD_REQUEST, "INVALID_UPLOAD"),
            Self::Processing(ProcessingError::UnsupportedFormat) => {
                (StatusCode::BAD_REQUEST, "INVALID_FILE_TYPE")
            }
            Self::Processing(ProcessingError::DecodeFailed(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_IMAGE")
            }
            Self::Processing(ProcessingError::EncodeFailed(_))
            | Self::Storage(_)
            | Self::Internal(_) => {
                tracing::error!(error = %self, "Image upload failed");
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal Server Error",
                );
            }
        };
        error_response(status, code, self.to_string())
    }
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub file_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImages {
    pub file_urls: Vec<String>,
}

// ============================================================================
// Helpers
// ============================================================================

/// One file read from the multipart body.
struct IncomingFile {
    filename: Option<String>,
    data: Vec<u8>,
}

/// Check the extension a client declared, when it declared one.
fn check_declared_type(filename: Option<&str>) -> Result<(), UploadError> {
    let Some(filename) = filename.filter(|f| !f.is_empty()) else {
        return Ok(());
    };
    let declared = mime_guess::from_path(filename).first();
    match declared {
        Some(mime) if ALLOWED_TYPES.contains(&mime.essence_str()) => Ok(()),
        _ => Err(UploadError::InvalidType),
    }
}

/// Collect the files sent under `field_name`, at most `max` of them.
async fn read_files(
    multipart: &mut Multipart,
    field_name: &str,
    max: usize,
    max_size: usize,
) -> Result<Vec<IncomingFile>, UploadError> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.to_string()))?
    {
        if field.name() != Some(field_name) {
            continue;
        }
        if files.len() == max {
            return Err(UploadError::TooManyFiles { max });
        }

        let filename = field.file_name().map(String::from);
        check_declared_type(filename.as_deref())?;

        let data = field
            .bytes()
            .await
            .map_err(|e| UploadError::Multipart(e.to_string()))?;
        if data.len() > max_size {
            return Err(UploadError::TooLarge { max_size });
        }
        if data.is_empty() {
            continue;
        }

        files.push(IncomingFile {
            filename,
            data: data.to_vec(),
        });
    }

    if files.is_empty() {
        return Err(UploadError::NoFile);
    }
    Ok(files)
}

/// Optimize one image off the async runtime and store it.
async fn store_image(s3: &S3Client, user_id: Uuid, file: IncomingFile) -> Result<String, UploadError> {
    let original_size = file.data.len();
    let optimized: OptimizedImage = tokio::task::spawn_blocking(move || optimize_image(&file.data))
        .await
        .map_err(|e| UploadError::Internal(e.to_string()))??;

    let key = format!("profiles/{user_id}/{}.jpg", Uuid::now_v7());

    tracing::debug!(
        filename = ?file.filename,
        original = %format_file_size(original_size),
        optimized = %format_file_size(optimized.data.len()),
        width = optimized.width,
        height = optimized.height,
        quality = optimized.quality,
        "Image optimized"
    );

    s3.upload(&key, optimized.data, OptimizedImage::CONTENT_TYPE)
        .await
        .map_err(|e| UploadError::Storage(e.to_string()))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /upload/single-file (multipart field `image`)
#[tracing::instrument(skip(state, multipart), fields(user_id = %auth.id))]
pub async fn upload_single(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, ApiResponse<UploadedImage>), UploadError> {
    let s3 = state.s3.as_ref().ok_or(UploadError::NotConfigured)?;

    let mut files = read_files(&mut multipart, "image", 1, state.config.max_upload_size).await?;
    let file = files.pop().ok_or(UploadError::NoFile)?;

    let file_url = store_image(s3, auth.id, file).await?;

    tracing::info!(file_url = %file_url, "Image uploaded");

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Your file is uploaded successfully.", UploadedImage { file_url }),
    ))
}

/// POST /upload/multiple-files (multipart field `images`, at most 5)
#[tracing::instrument(skip(state, multipart), fields(user_id = %auth.id))]
pub async fn upload_multiple(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, ApiResponse<UploadedImages>), UploadError> {
    let s3 = state.s3.as_ref().ok_or(UploadError::NotConfigured)?;

    let files = read_files(
        &mut multipart,
        "images",
        MAX_FILES,
        state.config.max_upload_size,
    )
    .await?;

    let uploads = files.into_iter().map(|file| store_image(s3, auth.id, file));
    let file_urls = futures::future::try_join_all(uploads).await?;

    tracing::info!(count = file_urls.len(), "Images uploaded");

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(
            "Your files are uploaded successfully.",
            UploadedImages { file_urls },
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_type_check() {
        assert!(check_declared_type(Some("me.jpg")).is_ok());
        assert!(check_declared_type(Some("me.JPEG")).is_ok());
        assert!(check_declared_type(Some("me.png")).is_ok());
        assert!(check_declared_type(Some("me.webp")).is_ok());
        assert!(check_declared_type(None).is_ok());

        assert!(matches!(
            check_declared_type(Some("me.gif")),
            Err(UploadError::InvalidType)
        ));
        assert!(matches!(
            check_declared_type(Some("notes.txt")),
            Err(UploadError::InvalidType)
        ));
    }

    #[test]
    fn test_too_large_is_413() {
        let response = UploadError::TooLarge { max_size: 1024 }.into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_not_configured_is_503() {
        let response = UploadError::NotConfigured.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
