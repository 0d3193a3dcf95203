//! SqliteStore - SQLite-backed debate storage

use super::helpers::{row_to_agent, row_to_discussion, row_to_log, to_db_int};
use super::traits::DebateStore;
use crate::error::{Error, Result};
use crate::models::{Agent, Discussion, DiscussionLog, DiscussionStatus};
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::{debug, info, instrument};

const AGENT_COLUMNS: &str = "id, name, provider_type, provider_url, api_token, model_name, \
     timeout_seconds, created_at, updated_at";

const DISCUSSION_COLUMNS: &str = "id, topic, agent_ids, moderator_id, status, max_rounds, \
     language, max_char_limit, final_summary, created_at, updated_at";

const LOG_COLUMNS: &str = "id, discussion_id, agent_id, content, status, response_time, \
     is_moderator, created_at";

fn db_err(e: sqlx::Error) -> Error {
    Error::Store(e.to_string())
}

/// Debate store persisting to SQLite
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a store over an existing pool (migrations are not run)
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open or create the database file and run migrations
    pub async fn from_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| Error::Store(format!("failed to create directory: {e}")))?;
            }
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await
            .map_err(db_err)?;

        let store = Self { pool };
        store.run_migrations().await?;

        info!("SQLite debate store initialized at {}", db_path.display());
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(db_err)?;

        let store = Self { pool };
        store.run_migrations().await?;

        debug!("In-memory SQLite debate store initialized");
        Ok(store)
    }

    /// Get the underlying pool
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn run_migrations(&self) -> Result<()> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS agents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                provider_type TEXT,
                provider_url TEXT NOT NULL,
                api_token TEXT,
                model_name TEXT NOT NULL,
                timeout_seconds INTEGER NOT NULL DEFAULT 30,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS discussions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                topic TEXT NOT NULL,
                agent_ids TEXT NOT NULL,
                moderator_id INTEGER,
                status TEXT NOT NULL DEFAULT 'running'
                    CHECK (status IN ('running', 'completed', 'failed')),
                max_rounds INTEGER NOT NULL DEFAULT 3,
                language TEXT NOT NULL DEFAULT 'English',
                max_char_limit INTEGER NOT NULL DEFAULT 2000,
                final_summary TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (moderator_id) REFERENCES agents(id) ON DELETE SET NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS discussion_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                discussion_id INTEGER NOT NULL,
                agent_id INTEGER NOT NULL,
                content TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL CHECK (status IN ('success', 'timeout', 'error')),
                response_time INTEGER NOT NULL DEFAULT 0,
                is_moderator BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TEXT NOT NULL,
                FOREIGN KEY (discussion_id) REFERENCES discussions(id) ON DELETE CASCADE,
                FOREIGN KEY (agent_id) REFERENCES agents(id) ON DELETE CASCADE
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_discussions_status ON discussions(status)",
            "CREATE INDEX IF NOT EXISTS idx_discussions_created_at ON discussions(created_at)",
            "CREATE INDEX IF NOT EXISTS idx_discussion_logs_discussion_id ON discussion_logs(discussion_id)",
            "CREATE INDEX IF NOT EXISTS idx_discussion_logs_agent_id ON discussion_logs(agent_id)",
        ];

        for sql in statements {
            sqlx::query(sql)
                .execute(&self.pool)
                .await
                .map_err(db_err)?;
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl DebateStore for SqliteStore {
    // =========================================================================
    // Agents
    // =========================================================================

    #[instrument(skip(self))]
    async fn get_agent(&self, id: i64) -> Result<Agent> {
        let row = sqlx::query(&format!("SELECT {AGENT_COLUMNS} FROM agents WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .ok_or(Error::AgentNotFound(id))?;

        row_to_agent(row)
    }

    async fn list_agents(&self) -> Result<Vec<Agent>> {
        sqlx::query(&format!(
            "SELECT {AGENT_COLUMNS} FROM agents ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(row_to_agent)
        .collect()
    }

    #[instrument(skip(self, agent), fields(name = %agent.name))]
    async fn insert_agent(&self, agent: Agent) -> Result<Agent> {
        let result = sqlx::query(
            r#"
            INSERT INTO agents (
                name, provider_type, provider_url, api_token, model_name,
                timeout_seconds, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&agent.name)
        .bind(agent.provider_type.map(|k| k.as_str()))
        .bind(&agent.provider_url)
        .bind(&agent.api_token)
        .bind(&agent.model_name)
        .bind(to_db_int(agent.timeout_seconds))
        .bind(agent.created_at.to_rfc3339())
        .bind(agent.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        let stored = Agent {
            id: result.last_insert_rowid(),
            ..agent
        };
        debug!("Created agent {}", stored.id);
        Ok(stored)
    }

    #[instrument(skip(self, agent), fields(id = agent.id))]
    async fn update_agent(&self, agent: &Agent) -> Result<Agent> {
        let result = sqlx::query(
            r#"
            UPDATE agents
            SET name = ?2, provider_type = ?3, provider_url = ?4, api_token = ?5,
                model_name = ?6, timeout_seconds = ?7, updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(agent.id)
        .bind(&agent.name)
        .bind(agent.provider_type.map(|k| k.as_str()))
        .bind(&agent.provider_url)
        .bind(&agent.api_token)
        .bind(&agent.model_name)
        .bind(to_db_int(agent.timeout_seconds))
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(Error::AgentNotFound(agent.id));
        }
        self.get_agent(agent.id).await
    }

    #[instrument(skip(self))]
    async fn delete_agent(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM agents WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(Error::AgentNotFound(id));
        }
        Ok(())
    }

    // =========================================================================
    // Discussions
    // =========================================================================

    #[instrument(skip(self, discussion), fields(topic = %discussion.topic))]
    async fn insert_discussion(&self, discussion: Discussion) -> Result<Discussion> {
        let agent_ids = serde_json::to_string(&discussion.agent_ids)
            .map_err(|e| Error::Internal(e.to_string()))?;

        let result = sqlx::query(
            r#"
            INSERT INTO discussions (
                topic, agent_ids, moderator_id, status, max_rounds, language,
                max_char_limit, final_summary, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&discussion.topic)
        .bind(agent_ids)
        .bind(discussion.moderator_id)
        .bind(discussion.status.as_str())
        .bind(i64::from(discussion.max_rounds))
        .bind(&discussion.language)
        .bind(to_db_int(discussion.max_char_limit))
        .bind(&discussion.final_summary)
        .bind(discussion.created_at.to_rfc3339())
        .bind(discussion.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        let stored = Discussion {
            id: result.last_insert_rowid(),
            ..discussion
        };
        debug!("Created discussion {}", stored.id);
        Ok(stored)
    }

    #[instrument(skip(self, discussion), fields(id = discussion.id, status = %discussion.status))]
    async fn update_discussion(&self, discussion: &Discussion) -> Result<Discussion> {
        let agent_ids = serde_json::to_string(&discussion.agent_ids)
            .map_err(|e| Error::Internal(e.to_string()))?;

        // The status guard makes the forward-only rule atomic
        let result = sqlx::query(
            r#"
            UPDATE discussions
            SET topic = ?2, agent_ids = ?3, moderator_id = ?4, status = ?5,
                max_rounds = ?6, language = ?7, max_char_limit = ?8,
                final_summary = ?9, updated_at = ?10
            WHERE id = ?1 AND (status = 'running' OR status = ?5)
            "#,
        )
        .bind(discussion.id)
        .bind(agent_ids)
        .bind(discussion.moderator_id)
        .bind(discussion.status.as_str())
        .bind(i64::from(discussion.max_rounds))
        .bind(&discussion.language)
        .bind(to_db_int(discussion.max_char_limit))
        .bind(&discussion.final_summary)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            let current = self.get_discussion(discussion.id).await?;
            return Err(Error::InvalidRequest(format!(
                "discussion {} cannot move from {} to {}",
                discussion.id, current.status, discussion.status
            )));
        }

        debug!("Updated discussion {}", discussion.id);
        self.get_discussion(discussion.id).await
    }

    #[instrument(skip(self), fields(status = %status))]
    async fn close_discussion(&self, id: i64, status: DiscussionStatus) -> Result<Discussion> {
        let result = sqlx::query(
            "UPDATE discussions SET status = ?2, updated_at = ?3 WHERE id = ?1 AND status = 'running'",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            // Surface DiscussionNotFound before NotRunning
            self.get_discussion(id).await?;
            return Err(Error::NotRunning(id));
        }

        debug!("Closed discussion {} as {}", id, status);
        self.get_discussion(id).await
    }

    #[instrument(skip(self))]
    async fn get_discussion(&self, id: i64) -> Result<Discussion> {
        let row = sqlx::query(&format!(
            "SELECT {DISCUSSION_COLUMNS} FROM discussions WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(Error::DiscussionNotFound(id))?;

        row_to_discussion(row)
    }

    async fn list_discussions(&self) -> Result<Vec<Discussion>> {
        sqlx::query(&format!(
            "SELECT {DISCUSSION_COLUMNS} FROM discussions ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(row_to_discussion)
        .collect()
    }

    #[instrument(skip(self))]
    async fn delete_discussion(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM discussions WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(Error::DiscussionNotFound(id));
        }
        Ok(())
    }

    // =========================================================================
    // Logs
    // =========================================================================

    #[instrument(skip(self, log), fields(discussion_id = log.discussion_id, agent_id = log.agent_id))]
    async fn insert_discussion_log(&self, log: DiscussionLog) -> Result<DiscussionLog> {
        let result = sqlx::query(
            r#"
            INSERT INTO discussion_logs (
                discussion_id, agent_id, content, status, response_time,
                is_moderator, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(log.discussion_id)
        .bind(log.agent_id)
        .bind(&log.content)
        .bind(log.status.as_str())
        .bind(to_db_int(log.response_time_ms))
        .bind(log.is_moderator)
        .bind(log.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(DiscussionLog {
            id: result.last_insert_rowid(),
            ..log
        })
    }

    async fn list_discussion_logs(&self, discussion_id: i64) -> Result<Vec<DiscussionLog>> {
        sqlx::query(&format!(
            "SELECT {LOG_COLUMNS} FROM discussion_logs WHERE discussion_id = ?1 ORDER BY id ASC"
        ))
        .bind(discussion_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(row_to_log)
        .collect()
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}
