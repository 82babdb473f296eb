//! Profile Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::api::error_response;
use crate::db::{ProfileSummary, UserProfile};
use crate::matchmaking::types::ShortlistedUser;

/// Most images a user may keep in their collection.
pub const MAX_COLLECTION_IMAGES: usize = 5;

/// Onboarding step submission.
#[derive(Debug, Deserialize)]
pub struct OnboardingRequest {
    pub step: Option<i64>,
    pub data: Option<Value>,
}

/// Onboarding progress after a step was saved.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingData {
    pub onboarding_step: i16,
    pub onboarding_status: vivah_common::OnboardingStatus,
    pub user: UserProfile,
}

/// Profile image update.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImageRequest {
    #[validate(url(message = "Please provide a valid image URL."))]
    pub profile_url: Option<String>,
}

/// One URL or a list of URLs.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// Trimmed, non-empty entries.
    pub fn into_urls(self) -> Vec<String> {
        let urls = match self {
            Self::One(url) => vec![url],
            Self::Many(urls) => urls,
        };
        urls.into_iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect()
    }
}

/// Images to append to the collection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddImagesRequest {
    pub image_collection_urls: Option<OneOrMany>,
}

/// The collection after an append.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageCollectionData {
    pub image_urls: Vec<String>,
    pub count: usize,
}

/// Own profile with likes and matches.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyProfileData {
    pub user: UserProfile,
    pub liked_users: Vec<ProfileSummary>,
    pub shortlisted_users: Vec<ShortlistedUser>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Invalid user id.")]
    InvalidId,
    #[error("User not found.")]
    UserNotFound,
    #[error("{0}")]
    Validation(String),
    #[error("Please complete step {current} first.")]
    StepOutOfOrder { current: i16 },
    #[error(
        "You can only have up to {max} images in your collection. You currently have {current}."
    )]
    CollectionFull { max: usize, current: usize },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ProfileError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::InvalidId => (StatusCode::BAD_REQUEST, "INVALID_ID"),
            Self::UserNotFound => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::StepOutOfOrder { .. } => (StatusCode::BAD_REQUEST, "STEP_OUT_OF_ORDER"),
            Self::CollectionFull { .. } => (StatusCode::BAD_REQUEST, "COLLECTION_FULL"),
            Self::Database(err) => {
                tracing::error!(%err, "Profile endpoint database error");
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
