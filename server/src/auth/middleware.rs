//! Authentication Middleware

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;
use vivah_common::{UserRole, UserStatus};

use crate::api::AppState;
use crate::db::{find_user_by_id, User};

use super::error::AuthError;
use super::jwt::validate_session_token;

/// Authenticated user injected into request extensions.
///
/// Carries only safe-to-expose user data; the password hash never leaves
/// the store layer.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            status: user.status,
        }
    }
}

/// The token the current request was authenticated with.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub token: String,
    /// Expiration time (Unix timestamp).
    pub expires_at: i64,
}

/// Pull the token out of the `Authorization` header.
///
/// Accepts `Bearer <token>` as well as a bare token.
fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = if value == "Bearer" {
        ""
    } else {
        value.strip_prefix("Bearer ").unwrap_or(value).trim()
    };
    (!token.is_empty()).then_some(token)
}

/// Middleware to require authentication.
///
/// Checks, in order: token present, token not revoked, signature and expiry,
/// subject still exists. Injects [`AuthUser`] and [`CurrentSession`] into
/// request extensions.
///
/// # Usage
///
/// ```ignore
/// Router::new()
///     .route("/protected", get(handler))
///     .layer(axum::middleware::from_fn_with_state(state, require_auth))
/// ```
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = extract_token(request.headers())
        .ok_or(AuthError::MissingToken)?
        .to_string();

    if state.revocations.is_revoked(&token) {
        return Err(AuthError::SessionRevoked);
    }

    let claims = validate_session_token(&token, &state.config.jwt_public_key)?;

    let user_id: Uuid = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

    let user = find_user_by_id(&state.db, user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    request.extensions_mut().insert(AuthUser::from(user));
    request.extensions_mut().insert(CurrentSession {
        token,
        expires_at: claims.exp,
    });

    Ok(next.run(request).await)
}

/// Extractor for the authenticated user in handlers.
///
/// ```ignore
/// async fn protected_handler(auth_user: AuthUser) -> impl IntoResponse {
///     format!("Hello, {}!", auth_user.full_name)
/// }
/// ```
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_and_bare_tokens() {
        assert_eq!(extract_token(&headers_with("Bearer abc.def")), Some("abc.def"));
        assert_eq!(extract_token(&headers_with("abc.def")), Some("abc.def"));
    }

    #[test]
    fn test_extract_missing_or_empty() {
        assert_eq!(extract_token(&HeaderMap::new()), None);
        assert_eq!(extract_token(&headers_with("Bearer ")), None);
        assert_eq!(extract_token(&headers_with("   ")), None);
    }
}
