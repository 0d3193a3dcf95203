//! Agents API endpoints
//!
//! GET    /api/agents - List agents
//! POST   /api/agents - Create an agent
//! GET    /api/agents/:id - Get an agent
//! PUT    /api/agents/:id - Update an agent
//! DELETE /api/agents/:id - Delete an agent
//! POST   /api/agents/:id/ping - Check the agent's provider is reachable
//! POST   /api/agents/:id/duplicate - Copy an agent as "<name> - Copy"

use axum::{
    extract::Path,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use roundtable_core::models::DEFAULT_TIMEOUT_SECS;
use roundtable_core::{Agent, DebateEngine, DebateStore};
use roundtable_llm::util::mask_api_key;
use roundtable_llm::ProviderKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::{ok, ApiError, ApiResult};

/// Create/update payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentRequest {
    #[serde(default)]
    pub name: String,
    /// One of ollama, openai, anthropic, google, custom; blank means detect from URL
    #[serde(default)]
    pub provider_type: Option<String>,
    #[serde(default)]
    pub provider_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub model_name: String,
    /// Number or numeric string
    #[serde(default)]
    pub timeout_seconds: Option<Value>,
}

impl AgentRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty()
            || self.provider_url.trim().is_empty()
            || self.model_name.trim().is_empty()
        {
            return Err(ApiError::bad_request(
                "name, provider_url, and model_name are required",
            ));
        }
        Ok(())
    }

    fn kind(&self) -> Result<Option<ProviderKind>, ApiError> {
        match self.provider_type.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(ApiError::bad_request),
        }
    }

    /// Write the request onto an agent record
    fn apply(&self, agent: &mut Agent) -> Result<(), ApiError> {
        self.validate()?;
        agent.name = self.name.trim().to_string();
        agent.provider_type = self.kind()?;
        agent.provider_url = self.provider_url.trim().to_string();
        agent.api_token = self
            .api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        agent.model_name = self.model_name.trim().to_string();
        agent.timeout_seconds = parse_timeout(self.timeout_seconds.as_ref());
        agent.updated_at = Utc::now();
        Ok(())
    }
}

/// Accept a positive number or numeric string; anything else is the default.
pub fn parse_timeout(raw: Option<&Value>) -> u64 {
    let parsed = match raw {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 1.0).map(|f| f as u64)),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.filter(|secs| *secs > 0).unwrap_or(DEFAULT_TIMEOUT_SECS)
}

/// Agent as returned by the API; the credential is masked
#[derive(Debug, Clone, Serialize)]
pub struct AgentView {
    pub id: i64,
    pub name: String,
    pub provider_type: ProviderKind,
    pub provider_url: String,
    pub api_token: Option<String>,
    pub model_name: String,
    pub timeout_seconds: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Agent> for AgentView {
    fn from(agent: Agent) -> Self {
        Self {
            id: agent.id,
            provider_type: agent.kind(),
            api_token: agent.api_token.as_deref().map(mask_api_key),
            name: agent.name,
            provider_url: agent.provider_url,
            model_name: agent.model_name,
            timeout_seconds: agent.timeout_seconds,
            created_at: agent.created_at,
            updated_at: agent.updated_at,
        }
    }
}

/// Ping result
#[derive(Debug, Serialize)]
pub struct PingView {
    pub id: i64,
    pub status: &'static str,
}

/// List agents
pub async fn list_agents(Extension(engine): Extension<DebateEngine>) -> ApiResult<Vec<AgentView>> {
    let agents = engine.store().list_agents().await?;
    ok(agents.into_iter().map(AgentView::from).collect())
}

/// Create an agent
pub async fn create_agent(
    Extension(engine): Extension<DebateEngine>,
    Json(request): Json<AgentRequest>,
) -> ApiResult<AgentView> {
    let mut agent = Agent::new("", "", "");
    request.apply(&mut agent)?;
    let agent = engine.store().insert_agent(agent).await?;
    info!(agent_id = agent.id, name = %agent.name, "Agent created");
    ok(agent.into())
}

/// Get an agent
pub async fn get_agent(
    Extension(engine): Extension<DebateEngine>,
    Path(id): Path<i64>,
) -> ApiResult<AgentView> {
    ok(engine.store().get_agent(id).await?.into())
}

/// Update an agent
pub async fn update_agent(
    Extension(engine): Extension<DebateEngine>,
    Path(id): Path<i64>,
    Json(request): Json<AgentRequest>,
) -> ApiResult<AgentView> {
    let mut agent = engine.store().get_agent(id).await?;
    request.apply(&mut agent)?;
    ok(engine.store().update_agent(&agent).await?.into())
}

/// Delete an agent
pub async fn delete_agent(
    Extension(engine): Extension<DebateEngine>,
    Path(id): Path<i64>,
) -> ApiResult<i64> {
    engine.store().delete_agent(id).await?;
    info!(agent_id = id, "Agent deleted");
    ok(id)
}

/// Check that an agent's provider answers
pub async fn ping_agent(
    Extension(engine): Extension<DebateEngine>,
    Path(id): Path<i64>,
) -> ApiResult<PingView> {
    engine.ping_participant(id).await?;
    ok(PingView { id, status: "ok" })
}

/// Copy an agent
pub async fn duplicate_agent(
    Extension(engine): Extension<DebateEngine>,
    Path(id): Path<i64>,
) -> ApiResult<AgentView> {
    let original = engine.store().get_agent(id).await?;
    let copy = engine.store().insert_agent(original.duplicate()).await?;
    ok(copy.into())
}

/// Create agent routes
pub fn agents_routes() -> Router {
    Router::new()
        .route("/api/agents", get(list_agents).post(create_agent))
        .route(
            "/api/agents/:id",
            get(get_agent).put(update_agent).delete(delete_agent),
        )
        .route("/api/agents/:id/ping", post(ping_agent))
        .route("/api/agents/:id/duplicate", post(duplicate_agent))
}
