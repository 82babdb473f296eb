//! User Profiles
//!
//! Profile reads, step-wise onboarding and the profile image collection.

pub mod handlers;
pub mod onboarding;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::AppState;

pub use types::ProfileError;

/// Create the profile router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile/{id}", get(handlers::get_profile))
        .route("/user/my-profile", get(handlers::my_profile))
        .route("/user/update-onboarding", post(handlers::update_onboarding))
        .route(
            "/user/update-profile-image",
            post(handlers::update_profile_image),
        )
        .route("/user/add-images", post(handlers::add_images))
}
