//! Discovery Type Definitions

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use vivah_common::{Gender, UserStatus};

use crate::api::error_response;
use crate::db::UserProfile;

/// Discovery result: who was asked for and the matching profiles.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryData {
    pub looking_for: Gender,
    pub count: usize,
    pub profiles: Vec<UserProfile>,
}

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("User not found.")]
    UserNotFound,
    #[error("You are blocked by admin. Please contact support.")]
    Blocked,
    #[error("Your subscription plan or some other requirement is pending. Please upgrade or complete the necessary steps.")]
    Muted,
    #[error("You are already married. Your profile is no longer available for matchmaking.")]
    Married,
    #[error("Your account is not active. Please contact support admin.")]
    Inactive(UserStatus),
    #[error("Your gender information is missing. Please complete your basic profile first.")]
    GenderMissing,
    #[error("Invalid gender '{0}'. Allowed values are: male, female.")]
    GenderUnrecognized(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for DiscoveryError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::UserNotFound => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
            Self::Blocked => (StatusCode::FORBIDDEN, "ACCOUNT_BLOCKED"),
            Self::Muted => (StatusCode::FORBIDDEN, "ACCOUNT_MUTED"),
            Self::Married => (StatusCode::FORBIDDEN, "ACCOUNT_MARRIED"),
            Self::Inactive(_) => (StatusCode::FORBIDDEN, "ACCOUNT_INACTIVE"),
            Self::GenderMissing | Self::GenderUnrecognized(_) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            Self::Database(err) => {
                tracing::error!(%err, "Discovery endpoint database error");
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
