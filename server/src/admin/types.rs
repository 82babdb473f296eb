//! Admin module types.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use vivah_common::{UserRole, UserStatus};

use crate::api::error_response;
use crate::db::UserProfile;

/// Authenticated admin or superadmin.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: Uuid,
    pub role: UserRole,
}

/// Admin API error type.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Caller is neither admin nor superadmin.
    #[error("Unauthorized: Only admin or superadmin can perform this action.")]
    NotAdmin,

    #[error("Invalid user id.")]
    InvalidId,

    #[error("User not found.")]
    UserNotFound,

    #[error("Partner user not found.")]
    PartnerNotFound,

    /// Validation error.
    #[error("{0}")]
    Validation(String),

    #[error("You cannot change your own role.")]
    SelfRoleChange,

    #[error("A user cannot be married to themselves.")]
    SelfMarriage,

    /// One of the two parties is already married.
    #[error("{0} is already married.")]
    AlreadyMarried(&'static str),

    /// Role hierarchy forbids the action.
    #[error("{0}")]
    Forbidden(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::NotAdmin => (StatusCode::FORBIDDEN, "NOT_ADMIN"),
            Self::InvalidId => (StatusCode::BAD_REQUEST, "INVALID_ID"),
            Self::UserNotFound | Self::PartnerNotFound => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
            Self::Validation(_) | Self::SelfMarriage => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            Self::AlreadyMarried(_) => (StatusCode::BAD_REQUEST, "CONFLICT"),
            Self::SelfRoleChange | Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Database(err) => {
                tracing::error!(%err, "Admin endpoint database error");
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

// Request types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
    pub married_with: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Option<String>,
}

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub status: Option<String>,
}

// Response types

/// A page of users.
#[derive(Debug, Serialize)]
pub struct PaginatedUsers {
    pub users: Vec<UserProfile>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Marriage update result: both partners after the write.
#[derive(Debug, Serialize)]
pub struct MarriageData {
    pub user: UserProfile,
    pub partner: UserProfile,
}

/// Status update result.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StatusUpdateData {
    User(UserProfile),
    Married(MarriageData),
}

/// User totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCountData {
    pub total: i64,
    /// Count per status, with zero for statuses nobody holds.
    pub by_status: BTreeMap<&'static str, i64>,
}

impl UserCountData {
    pub fn from_counts(counts: impl IntoIterator<Item = (UserStatus, i64)>) -> Self {
        let mut by_status: BTreeMap<&'static str, i64> =
            UserStatus::ALL.iter().map(|s| (s.as_str(), 0)).collect();
        let mut total = 0;
        for (status, count) in counts {
            *by_status.entry(status.as_str()).or_default() += count;
            total += count;
        }
        Self { total, by_status }
    }
}

/// Parse a status from the request body.
pub fn parse_status(raw: Option<&str>) -> Result<UserStatus, AdminError> {
    raw.map(str::trim)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            let allowed: Vec<_> = UserStatus::ALL.iter().map(|s| s.as_str()).collect();
            AdminError::Validation(format!(
                "Invalid status value. Allowed statuses are: {}",
                allowed.join(", ")
            ))
        })
}

/// Parse a role from the request body.
pub fn parse_role(raw: Option<&str>) -> Result<UserRole, AdminError> {
    raw.map(str::trim)
        .and_then(|r| r.parse().ok())
        .ok_or_else(|| {
            let allowed: Vec<_> = UserRole::ALL.iter().map(|r| r.as_str()).collect();
            AdminError::Validation(format!(
                "Invalid role value. Allowed roles are: {}",
                allowed.join(", ")
            ))
        })
}
