//! Request Extractors
//!
//! Drop-in replacements for `axum::Json` and `axum::extract::Query` whose
//! rejections use the standard error envelope and always answer 400.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::response::error_response;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiRejection))]
pub struct Json<T>(pub T);

/// Query string parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiRejection))]
pub struct Query<T>(pub T);

/// A request body or query string that could not be read.
#[derive(Debug)]
pub enum ApiRejection {
    Body(JsonRejection),
    Query(QueryRejection),
}

impl From<JsonRejection> for ApiRejection {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl From<QueryRejection> for ApiRejection {
    fn from(rejection: QueryRejection) -> Self {
        Self::Query(rejection)
    }
}

impl IntoResponse for ApiRejection {
    fn into_response(self) -> Response {
        let (code, message) = match &self {
            Self::Body(rejection) => (
                "INVALID_BODY",
                format!("Invalid request body: {}", rejection.body_text()),
            ),
            Self::Query(rejection) => (
                "INVALID_QUERY",
                format!("Invalid query parameters: {}", rejection.body_text()),
            ),
        };
        tracing::debug!(code, %message, "Request rejected");
        error_response(StatusCode::BAD_REQUEST, code, message)
    }
}
