//! Profile Discovery
//!
//! Status-gated listing of complementary-gender profiles.

pub mod gate;
pub mod handlers;
pub mod types;

use axum::{routing::get, Router};

use crate::api::AppState;

pub use types::DiscoveryError;

/// Create the discovery router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/user/get-gender-based-profiles",
        get(handlers::gender_based_profiles),
    )
}
