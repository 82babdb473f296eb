//! Authentication HTTP Handlers

use std::sync::LazyLock;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;
use vivah_common::UserRole;

use super::error::{AuthError, AuthResult, IdentifierKind};
use super::jwt::generate_session_token;
use super::middleware::{AuthUser, CurrentSession};
use super::password::{hash_password, verify_password};
use crate::api::{ApiResponse, AppState, Json};
use crate::db::{
    create_user, find_user_by_email, find_user_by_phone, is_unique_violation, NewUser,
    UserProfile,
};
use crate::util::first_validation_message;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Signup request. Fields are optional so missing ones get a friendly message.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: Option<String>,
    #[validate(length(min = 8, max = 128, message = "Password must be at least 8 characters long."))]
    pub password: Option<String>,
    #[validate(length(max = 100, message = "Full name must be at most 100 characters."))]
    pub full_name: Option<String>,
    pub phone_no: Option<String>,
    pub role: Option<String>,
}

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email address or phone number.
    #[serde(alias = "emailOrPhone", alias = "email", alias = "phoneNo")]
    pub identifier: Option<String>,
    pub password: Option<String>,
}

/// Login response payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub token: String,
    /// Token validity in seconds.
    pub expires_in: i64,
    pub user: UserProfile,
}

// ============================================================================
// Regex for validation
// ============================================================================

/// Single `@`, no whitespace, dotted domain.
pub(crate) static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

/// Optional leading `+`, 7 to 15 digits.
pub(crate) static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("phone regex is valid"));

// ============================================================================
// Helper Functions
// ============================================================================

/// Trimmed, non-empty value of an optional field.
fn required(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Decide how to look up a login identifier.
fn classify_identifier(identifier: &str) -> (IdentifierKind, String) {
    if EMAIL_REGEX.is_match(identifier) {
        (IdentifierKind::Email, identifier.to_lowercase())
    } else {
        (IdentifierKind::Phone, identifier.to_string())
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Create an account.
///
/// Email is stored lower-cased, name and phone trimmed. Elevated roles can
/// not be self-assigned; they are granted through the admin routes.
///
/// POST /signup
#[tracing::instrument(skip(state, body))]
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> AuthResult<impl IntoResponse> {
    let (Some(email), Some(password), Some(full_name), Some(phone_no)) = (
        required(body.email.as_ref()),
        body.password.as_deref().filter(|p| !p.is_empty()),
        required(body.full_name.as_ref()),
        required(body.phone_no.as_ref()),
    ) else {
        return Err(AuthError::Validation("All fields are required.".into()));
    };

    if !EMAIL_REGEX.is_match(email) {
        return Err(AuthError::Validation(
            "Please provide a valid email address.".into(),
        ));
    }
    if !PHONE_REGEX.is_match(phone_no) {
        return Err(AuthError::Validation(
            "Please provide a valid phone number.".into(),
        ));
    }
    body.validate()
        .map_err(|e| AuthError::Validation(first_validation_message(&e)))?;

    let role = match body.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        None => UserRole::User,
        Some(raw) => raw
            .to_lowercase()
            .parse::<UserRole>()
            .map_err(|e| AuthError::Validation(e.to_string()))?,
    };
    if role != UserRole::User {
        return Err(AuthError::Validation(
            "Elevated roles can only be granted by an administrator.".into(),
        ));
    }

    let email = email.to_lowercase();

    // Fast checks for a precise message; the UNIQUE constraints catch races
    if find_user_by_email(&state.db, &email).await?.is_some() {
        return Err(AuthError::AlreadyRegistered(IdentifierKind::Email.label()));
    }
    if find_user_by_phone(&state.db, phone_no).await?.is_some() {
        return Err(AuthError::AlreadyRegistered(IdentifierKind::Phone.label()));
    }

    let password_hash = hash_password(password).map_err(|_| AuthError::PasswordHash)?;

    let user = create_user(
        &state.db,
        &NewUser {
            full_name,
            email: &email,
            phone_no,
            password_hash: &password_hash,
            role,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e, "users_email_key") {
            AuthError::AlreadyRegistered(IdentifierKind::Email.label())
        } else if is_unique_violation(&e, "users_phone_no_key") {
            AuthError::AlreadyRegistered(IdentifierKind::Phone.label())
        } else {
            AuthError::Database(e)
        }
    })?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("User registered successfully.", UserProfile::from(user)),
    ))
}

/// Log in with an email address or phone number.
///
/// POST /login
#[tracing::instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AuthResult<ApiResponse<LoginData>> {
    let (Some(identifier), Some(password)) = (
        required(body.identifier.as_ref()),
        body.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(AuthError::Validation("All fields are required.".into()));
    };

    let (kind, lookup) = classify_identifier(identifier);
    let user = match kind {
        IdentifierKind::Email => find_user_by_email(&state.db, &lookup).await?,
        IdentifierKind::Phone => find_user_by_phone(&state.db, &lookup).await?,
    }
    .ok_or(AuthError::AccountNotFound(kind))?;

    if !verify_password(password, &user.password_hash) {
        tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
        return Err(AuthError::InvalidCredentials);
    }

    let session = generate_session_token(
        user.id,
        user.role,
        &state.config.jwt_private_key,
        state.config.jwt_expiry,
    )?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(ApiResponse::ok(
        "Login successful.",
        LoginData {
            token: session.token,
            expires_in: session.expires_in,
            user: UserProfile::from(user),
        },
    ))
}

/// Revoke the token this request was made with.
///
/// POST /logout
#[tracing::instrument(skip(state, session), fields(user_id = %auth_user.id))]
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
    session: CurrentSession,
) -> AuthResult<ApiResponse<()>> {
    if state.revocations.revoke(&session.token, session.expires_at) {
        tracing::info!(user_id = %auth_user.id, "User logged out");
    }

    Ok(ApiResponse::message("You have been logged out successfully."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_regex() {
        assert!(EMAIL_REGEX.is_match("a@x.com"));
        assert!(!EMAIL_REGEX.is_match("a@@x.com"));
        assert!(!EMAIL_REGEX.is_match("a b@x.com"));
        assert!(!EMAIL_REGEX.is_match("a@x"));
    }

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("+15551234567"));
        assert!(PHONE_REGEX.is_match("5551234"));
        assert!(!PHONE_REGEX.is_match("555-1234"));
        assert!(!PHONE_REGEX.is_match("123456"));
    }

    #[test]
    fn test_classify_identifier() {
        assert_eq!(
            classify_identifier("Asha@Example.com"),
            (IdentifierKind::Email, "asha@example.com".to_string())
        );
        assert_eq!(
            classify_identifier("+15551234567"),
            (IdentifierKind::Phone, "+15551234567".to_string())
        );
    }

    #[test]
    fn test_required_trims() {
        let blank = Some("   ".to_string());
        let name = Some("  Asha ".to_string());
        assert_eq!(required(blank.as_ref()), None);
        assert_eq!(required(name.as_ref()), Some("Asha"));
        assert_eq!(required(None), None);
    }

    #[test]
    fn test_short_password_fails_validation() {
        let body = SignupRequest {
            email: Some("a@x.com".into()),
            password: Some("short".into()),
            full_name: Some("A".into()),
            phone_no: Some("+15551234567".into()),
            role: None,
        };
        let err = body.validate().unwrap_err();
        assert_eq!(
            first_validation_message(&err),
            "Password must be at least 8 characters long."
        );
    }
}
