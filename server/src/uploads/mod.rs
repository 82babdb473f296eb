//! Image Uploads
//!
//! Multipart image upload to S3-compatible storage.

pub mod handlers;
pub mod processing;
pub mod s3;

use axum::{routing::post, Router};

use crate::api::AppState;

pub use handlers::UploadError;
pub use s3::{S3Client, S3Error};

/// Create the upload router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload/single-file", post(handlers::upload_single))
        .route("/upload/multiple-files", post(handlers::upload_multiple))
}
