//! Admin Module
//!
//! Moderation endpoints for admins and superadmins:
//! - Status changes, including recording a marriage between two users
//! - Role changes within the role hierarchy
//! - User listing and per-status counts

pub mod handlers;
pub mod middleware;
pub mod sweep;
pub mod types;

use axum::{
    middleware::from_fn,
    routing::{get, put},
    Router,
};

use crate::api::AppState;

pub use middleware::require_admin;
pub use sweep::spawn_consistency_sweep;
pub use types::{AdminError, AdminUser};

/// Create the admin router.
///
/// Nested under the authenticated router, so `AuthUser` is already present
/// when `require_admin` runs.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/update-status/{id}", put(handlers::update_status))
        .route("/update-role/{id}", put(handlers::update_role))
        .route("/get-all-users", get(handlers::get_all_users))
        .route("/get-user-count", get(handlers::get_user_count))
        .layer(from_fn(require_admin))
}
