//! Web API module for Roundtable
//!
//! Provides REST API endpoints for:
//! - Agent management and reachability checks
//! - Discussion lifecycle (start, stop, retry, delete)
//! - Live discussion updates over server-sent events

pub mod agents;
pub mod discussions;
pub mod health;
pub mod stream;


use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json, Router};
use roundtable_core::{DebateEngine, Error};
use serde::Serialize;

pub use agents::agents_routes;
pub use discussions::discussions_routes;
pub use health::health_routes;

/// Create the API router with all endpoints
pub fn api_router(engine: DebateEngine) -> Router {
    Router::new()
        .merge(agents_routes())
        .merge(discussions_routes())
        .layer(Extension(engine))
}

/// Response envelope used by every endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> ApiResponse<T> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error half of a handler result, rendered as an error envelope
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            e if e.is_not_found() => StatusCode::NOT_FOUND,
            Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotRunning(_) | Error::AlreadyRunning(_) => StatusCode::CONFLICT,
            Error::Llm(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::warn!(error = %err, "Request failed");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::error(self.message))).into_response()
    }
}

/// Handler result carrying the envelope on both sides
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Wrap a value in a success envelope
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}
