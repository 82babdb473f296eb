//! API Router and Application State
//!
//! Central routing configuration and shared state.

mod extract;
mod response;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit, extract::State, middleware::from_fn_with_state, routing::get, Router,
};
use serde::Serialize;
use sqlx::PgPool;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    admin, auth,
    auth::RevocationRegistry,
    config::Config,
    discovery, matchmaking, profile, uploads,
    uploads::S3Client,
};

pub use extract::{ApiRejection, Json, Query};
pub use response::{error_response, ApiResponse, ErrorResponse};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Server configuration
    pub config: Arc<Config>,
    /// S3 client for image storage (optional)
    pub s3: Option<S3Client>,
    /// Logged-out session tokens
    pub revocations: Arc<RevocationRegistry>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        db: PgPool,
        config: Config,
        s3: Option<S3Client>,
        revocations: Arc<RevocationRegistry>,
    ) -> Self {
        Self {
            db,
            config: Arc::new(config),
            s3,
            revocations,
        }
    }

    /// Check if S3 storage is configured and available.
    #[must_use]
    pub const fn has_s3(&self) -> bool {
        self.s3.is_some()
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Get max upload size from config (default 50MB)
    let max_upload_size = state.config.max_upload_size;

    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(profile::router())
        .merge(discovery::router())
        .merge(matchmaking::router())
        .merge(uploads::router())
        .nest("/admin", admin::router())
        .layer(from_fn_with_state(state.clone(), auth::require_auth));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Signup, login, logout (pass state for middleware)
        .merge(auth::router(state.clone()))
        .merge(protected_routes)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        // Raise body limit for image uploads (default is 2MB)
        .layer(DefaultBodyLimit::max(max_upload_size))
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Whether image uploads are available
    storage: bool,
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> axum::Json<HealthResponse> {
    axum::Json(HealthResponse {
        status: "ok",
        storage: state.has_s3(),
    })
}
