//! Authentication Service
//!
//! Signup, login, logout and the authorization gate used by every protected
//! route.

mod error;
mod handlers;
pub mod jwt;
mod middleware;
pub mod password;
pub mod revocation;

use axum::{middleware as axum_middleware, routing::post, Router};

use crate::api::AppState;

pub use error::{AuthError, AuthResult, IdentifierKind};
pub use middleware::{require_auth, AuthUser, CurrentSession};
pub use revocation::{hash_token, spawn_purge_task, RevocationRegistry};

/// Create authentication router.
///
/// Public routes (no auth required):
/// - POST /signup - Create an account
/// - POST /login - Issue a session token
///
/// Protected routes (auth required):
/// - POST /logout - Revoke the presented token
pub fn router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new()
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login));

    let protected_routes = Router::new()
        .route("/logout", post(handlers::logout))
        .layer(axum_middleware::from_fn_with_state(state, require_auth));

    public_routes.merge(protected_routes)
}
