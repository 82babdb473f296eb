//! Matchmaking
//!
//! Likes and the shortlist (match request) workflow.

pub mod handlers;
pub mod queries;
pub mod state;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::AppState;

pub use types::ShortlistError;

/// Create the matchmaking router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user/toggle-like/{target_user_id}", post(handlers::toggle_like))
        // Shortlist requests
        .route(
            "/user/send-shortlist-request/{target_user_id}",
            post(handlers::send_request),
        )
        .route(
            "/user/accept-shortlist-request/{requester_id}",
            post(handlers::accept_request),
        )
        .route(
            "/user/reject-shortlist-request/{requester_id}",
            post(handlers::reject_request),
        )
        // Relationship queries
        .route(
            "/user/get-shortlist-status/{target_user_id}",
            get(handlers::shortlist_status),
        )
        .route(
            "/user/get-pending-shortlist-requests",
            get(handlers::pending_requests),
        )
        .route("/user/get-sent-shortlist-requests", get(handlers::sent_requests))
        .route("/user/get-shortlisted-users", get(handlers::shortlisted_users))
}
