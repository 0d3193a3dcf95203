//! Discussions API endpoints
//!
//! GET    /api/discussions - List discussions
//! POST   /api/discussions - Start a debate
//! GET    /api/discussions/:id - Discussion with its log entries
//! DELETE /api/discussions/:id - Delete a discussion and its logs
//! POST   /api/discussions/:id/stop - Stop a running debate
//! POST   /api/discussions/:id/retry/:agent_id - Ask one agent again
//! GET    /api/discussions/:id/stream - Live updates (SSE)

use axum::{
    extract::Path,
    routing::{get, post},
    Extension, Json, Router,
};
use roundtable_core::{DebateEngine, DebateRequest, DebateStore, Discussion, DiscussionLog};
use serde::Serialize;

use super::stream::stream_discussion;
use super::{ok, ApiResult};

/// A discussion together with its log entries
#[derive(Debug, Serialize)]
pub struct DiscussionDetail {
    pub discussion: Discussion,
    pub logs: Vec<DiscussionLog>,
}

/// List discussions, newest first
pub async fn list_discussions(
    Extension(engine): Extension<DebateEngine>,
) -> ApiResult<Vec<Discussion>> {
    ok(engine.store().list_discussions().await?)
}

/// Start a debate; it keeps running after the response is sent
pub async fn create_discussion(
    Extension(engine): Extension<DebateEngine>,
    Json(request): Json<DebateRequest>,
) -> ApiResult<Discussion> {
    ok(engine.start_debate(request).await?)
}

/// Discussion status and its log entries
pub async fn get_discussion(
    Extension(engine): Extension<DebateEngine>,
    Path(id): Path<i64>,
) -> ApiResult<DiscussionDetail> {
    let (discussion, logs) = engine.get_status(id).await?;
    ok(DiscussionDetail { discussion, logs })
}

/// Delete a discussion
pub async fn delete_discussion(
    Extension(engine): Extension<DebateEngine>,
    Path(id): Path<i64>,
) -> ApiResult<i64> {
    engine.delete_debate(id).await?;
    ok(id)
}

/// Stop a running debate
pub async fn stop_discussion(
    Extension(engine): Extension<DebateEngine>,
    Path(id): Path<i64>,
) -> ApiResult<Discussion> {
    ok(engine.stop_debate(id).await?)
}

/// Retry one agent in a running debate
pub async fn retry_agent(
    Extension(engine): Extension<DebateEngine>,
    Path((id, agent_id)): Path<(i64, i64)>,
) -> ApiResult<DiscussionLog> {
    ok(engine.retry_participant(id, agent_id).await?)
}

/// Create discussion routes
pub fn discussions_routes() -> Router {
    Router::new()
        .route(
            "/api/discussions",
            get(list_discussions).post(create_discussion),
        )
        .route(
            "/api/discussions/:id",
            get(get_discussion).delete(delete_discussion),
        )
        .route("/api/discussions/:id/stop", post(stop_discussion))
        .route("/api/discussions/:id/retry/:agent_id", post(retry_agent))
        .route("/api/discussions/:id/stream", get(stream_discussion))
}
