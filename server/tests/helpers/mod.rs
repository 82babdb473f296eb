//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for sending requests through the full axum router,
//! plus utilities for user creation and session tokens.
//!
//! Each test receives its own migrated database from `#[sqlx::test]`, so no
//! cleanup is needed between tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{self, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;
use vivah_common::{UserRole, UserStatus};
use vivah_server::api::{create_router, AppState};
use vivah_server::auth::{jwt, password::hash_password, RevocationRegistry};
use vivah_server::config::Config;
use vivah_server::db::{self, NewUser};

/// Password every test user is created with.
pub const TEST_PASSWORD: &str = "longenough1";

// ============================================================================
// Test App
// ============================================================================

/// A test application wrapping the full axum router.
pub struct TestApp {
    pub router: Router,
    pub pool: PgPool,
    pub config: Arc<Config>,
}

impl TestApp {
    /// Build the router over the given pool, without storage.
    pub fn new(pool: PgPool) -> Self {
        Self::with_config(pool, Config::default_for_test())
    }

    /// Build the router with a custom config.
    pub fn with_config(pool: PgPool, config: Config) -> Self {
        let state = AppState::new(
            pool.clone(),
            config.clone(),
            None,
            Arc::new(RevocationRegistry::new()),
        );
        Self {
            router: create_router(state),
            pool,
            config: Arc::new(config),
        }
    }

    /// Build an HTTP request with the given method and URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }

    /// Send a request with an optional bearer token and JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Self::request(method, uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");
        self.oneshot(request).await
    }

    /// GET with a token, returning status and JSON body.
    pub async fn get(&self, uri: &str, token: &str) -> (u16, Value) {
        let response = self.send(Method::GET, uri, Some(token), None).await;
        let status = response.status().as_u16();
        (status, body_to_json(response).await)
    }

    /// POST with a token, returning status and JSON body.
    pub async fn post(&self, uri: &str, token: &str, body: Option<Value>) -> (u16, Value) {
        let response = self.send(Method::POST, uri, Some(token), body).await;
        let status = response.status().as_u16();
        (status, body_to_json(response).await)
    }

    /// PUT with a token, returning status and JSON body.
    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (u16, Value) {
        let response = self.send(Method::PUT, uri, Some(token), Some(body)).await;
        let status = response.status().as_u16();
        (status, body_to_json(response).await)
    }

    /// Issue a session token for a user.
    pub fn token_for(&self, user: &TestUser) -> String {
        jwt::generate_session_token(
            user.id,
            user.role,
            &self.config.jwt_private_key,
            self.config.jwt_expiry,
        )
        .expect("Failed to generate session token")
        .token
    }
}

// ============================================================================
// User helpers
// ============================================================================

/// A user created directly in the store.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub phone_no: String,
    pub role: UserRole,
}

/// Create a pending user with no profile sections.
pub async fn create_test_user(pool: &PgPool) -> TestUser {
    let suffix = Uuid::new_v4().simple().to_string();
    let email = format!("user_{}@example.com", &suffix[..12]);
    let phone_no = format!("9{:09}", Uuid::new_v4().as_u128() % 1_000_000_000);
    let password_hash = hash_password(TEST_PASSWORD).expect("Failed to hash password");

    let user = db::create_user(
        pool,
        &NewUser {
            full_name: "Test User",
            email: &email,
            phone_no: &phone_no,
            password_hash: &password_hash,
            role: UserRole::User,
        },
    )
    .await
    .expect("Failed to create test user");

    TestUser {
        id: user.id,
        email,
        phone_no,
        role: UserRole::User,
    }
}

/// Create an active user with the given gender in basic information.
pub async fn create_active_user(pool: &PgPool, gender: &str) -> TestUser {
    let user = create_test_user(pool).await;
    sqlx::query(
        "UPDATE users SET status = 'active', basic_information = $2, onboarding_step = 2 WHERE id = $1",
    )
    .bind(user.id)
    .bind(json!({ "gender": gender }))
    .execute(pool)
    .await
    .expect("Failed to activate test user");
    user
}

/// Overwrite a user's status.
pub async fn set_status(pool: &PgPool, user_id: Uuid, status: UserStatus) {
    sqlx::query("UPDATE users SET status = $2 WHERE id = $1")
        .bind(user_id)
        .bind(status)
        .execute(pool)
        .await
        .expect("Failed to set status");
}

/// Overwrite a user's role.
pub async fn set_role(pool: &PgPool, user: &mut TestUser, role: UserRole) {
    sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
        .bind(user.id)
        .bind(role)
        .execute(pool)
        .await
        .expect("Failed to set role");
    user.role = role;
}

/// Collect a response body and parse it as JSON.
pub async fn body_to_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect response body")
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        let preview = String::from_utf8_lossy(&bytes);
        panic!("Failed to parse response as JSON: {e}\nBody: {preview}")
    })
}
