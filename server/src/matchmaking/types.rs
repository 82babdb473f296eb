//! Matchmaking Types

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;
use vivah_common::{RelationshipView, ShortlistStatus};

use crate::api::error_response;
use crate::db::ProfileSummary;

/// Relationship of the acting user to another user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipData {
    pub user_id: Uuid,
    pub status: RelationshipView,
}

/// Result of a like toggle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeData {
    pub user_id: Uuid,
    pub liked: bool,
}

/// Accepted relationship joined with the counterpart's public fields.
#[derive(Debug, Clone, FromRow)]
pub struct MatchRow {
    #[sqlx(flatten)]
    pub profile: ProfileSummary,
    pub requester_id: Uuid,
    pub addressee_id: Uuid,
    pub shortlist_status: ShortlistStatus,
    pub matched_at: DateTime<Utc>,
}

/// Entry in the shortlisted-users list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortlistedUser {
    #[serde(flatten)]
    pub profile: ProfileSummary,
    pub shortlist_status: ShortlistStatus,
    /// Re-derived from both participants' view of the record.
    pub is_mutual: bool,
    pub matched_at: DateTime<Utc>,
}

/// Error types for matchmaking operations
#[derive(Debug, thiserror::Error)]
pub enum ShortlistError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid user id.")]
    InvalidId,

    #[error("User not found.")]
    UserNotFound,

    #[error("You cannot shortlist your own profile.")]
    SelfRequest,

    #[error("You cannot like your own profile.")]
    SelfLike,

    #[error("Request already sent or user already shortlisted.")]
    AlreadyRequested,

    #[error("You are already connected.")]
    AlreadyConnected,

    #[error("No pending shortlist request from this user.")]
    NoPendingRequest,
}

impl axum::response::IntoResponse for ShortlistError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let (status, code) = match &self {
            Self::Database(err) => {
                tracing::error!("Database error: {}", err);
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal Server Error",
                );
            }
            Self::InvalidId => (StatusCode::BAD_REQUEST, "INVALID_ID"),
            Self::UserNotFound => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
            Self::SelfRequest | Self::SelfLike => (StatusCode::BAD_REQUEST, "SELF_REFERENCE"),
            // Conflicts are reported as 400
            Self::AlreadyRequested | Self::AlreadyConnected => (StatusCode::BAD_REQUEST, "CONFLICT"),
            Self::NoPendingRequest => (StatusCode::BAD_REQUEST, "NO_PENDING_REQUEST"),
        };

        error_response(status, code, self.to_string())
    }
}
