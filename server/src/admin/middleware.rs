//! Admin authorization middleware.

use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use super::types::{AdminError, AdminUser};
use crate::auth::AuthUser;

/// Middleware that requires the user to be an admin or superadmin.
///
/// Runs after `require_auth`, so the role is the one read from the store on
/// this request.
#[tracing::instrument(skip(request, next))]
pub async fn require_admin(mut request: Request, next: Next) -> Result<Response, AdminError> {
    let auth = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or(AdminError::NotAdmin)?;

    if !auth.role.is_admin() {
        tracing::warn!(user_id = %auth.id, role = %auth.role, "Admin access denied");
        return Err(AdminError::NotAdmin);
    }

    request.extensions_mut().insert(AdminUser {
        id: auth.id,
        role: auth.role,
    });

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AdminError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or(AdminError::NotAdmin)
    }
}
