//! Authentication Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::error_response;

/// How a login identifier was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Email,
    Phone,
}

impl IdentifierKind {
    /// Human-readable field name used in messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone number",
        }
    }
}

/// Authentication error types.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No token on a protected request.
    #[error("Authorization token missing.")]
    MissingToken,

    /// Token was logged out.
    #[error("Session expired. Please log in again.")]
    SessionRevoked,

    /// Token has expired.
    #[error("Token expired. Please log in again.")]
    TokenExpired,

    /// Bad signature or malformed token.
    #[error("Invalid authentication token.")]
    InvalidToken,

    /// Token subject no longer resolves to a user.
    #[error("User not found or authentication failed.")]
    UserNotFound,

    /// Validation error.
    #[error("{0}")]
    Validation(String),

    /// Email or phone already registered.
    #[error("The provided {0} has already been registered. Please use a different one.")]
    AlreadyRegistered(&'static str),

    /// No account matches the login identifier.
    #[error("Sorry, we couldn't find a user with that {}.", .0.label())]
    AccountNotFound(IdentifierKind),

    /// Wrong password.
    #[error("Invalid password provided.")]
    InvalidCredentials,

    /// Password hashing error.
    #[error("Password processing failed")]
    PasswordHash,

    /// Database error.
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    /// JWT signing error.
    #[error("Token error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Internal server error.
    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::MissingToken => (StatusCode::UNAUTHORIZED, "MISSING_AUTH"),
            Self::SessionRevoked => (StatusCode::UNAUTHORIZED, "SESSION_REVOKED"),
            Self::TokenExpired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
            Self::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            Self::UserNotFound => (StatusCode::UNAUTHORIZED, "USER_NOT_FOUND"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::AlreadyRegistered(_) => (StatusCode::BAD_REQUEST, "CONFLICT"),
            Self::AccountNotFound(_) => (StatusCode::BAD_REQUEST, "ACCOUNT_NOT_FOUND"),
            Self::InvalidCredentials => (StatusCode::BAD_REQUEST, "INVALID_CREDENTIALS"),
            Self::PasswordHash | Self::Jwt(_) | Self::Internal(_) => {
                tracing::error!(error = ?self, "Authentication internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
            Self::Database(err) => {
                tracing::error!(error = %err, "Authentication database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };

        error_response(status, code, message)
    }
}

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_conflicting_field() {
        assert_eq!(
            AuthError::AlreadyRegistered("email").to_string(),
            "The provided email has already been registered. Please use a different one."
        );
        assert_eq!(
            AuthError::AccountNotFound(IdentifierKind::Phone).to_string(),
            "Sorry, we couldn't find a user with that phone number."
        );
    }

    #[test]
    fn test_gate_failures_are_unauthorized() {
        for err in [
            AuthError::MissingToken,
            AuthError::SessionRevoked,
            AuthError::TokenExpired,
            AuthError::InvalidToken,
            AuthError::UserNotFound,
        ] {
            assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_login_failures_are_bad_request() {
        assert_eq!(
            AuthError::InvalidCredentials.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::AccountNotFound(IdentifierKind::Email)
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }
}
