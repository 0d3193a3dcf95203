//! Helper functions for store module

use crate::error::Error;
use crate::models::{Agent, Discussion, DiscussionLog, DiscussionStatus, LogStatus};
use chrono::{DateTime, Utc};
use roundtable_llm::ProviderKind;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Store(format!("invalid timestamp: {e}")))
}

fn to_unsigned<T: TryFrom<i64>>(value: i64, column: &str) -> Result<T, Error> {
    T::try_from(value).map_err(|_| Error::Store(format!("negative value in {column}: {value}")))
}

/// Decode the stored participant list.
///
/// Older rows may hold a bare comma-separated list instead of JSON.
pub(crate) fn parse_agent_ids(raw: &str) -> Result<Vec<i64>, Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed)
            .map_err(|e| Error::Store(format!("invalid agent_ids: {e}")));
    }
    Ok(trimmed
        .split(',')
        .map(|part| part.trim().trim_matches('"'))
        .filter_map(|part| part.parse().ok())
        .collect())
}

/// Convert a SQLite row to an Agent
pub(crate) fn row_to_agent(row: SqliteRow) -> Result<Agent, Error> {
    let provider_type: Option<String> = row.get("provider_type");
    let api_token: Option<String> = row.get("api_token");
    let timeout_seconds: i64 = row.get("timeout_seconds");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    // Unknown kinds fall back to URL detection rather than failing the row
    let provider_type = provider_type
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| s.parse::<ProviderKind>().ok());

    Ok(Agent {
        id: row.get("id"),
        name: row.get("name"),
        provider_type,
        provider_url: row.get("provider_url"),
        api_token: api_token.filter(|t| !t.is_empty()),
        model_name: row.get("model_name"),
        timeout_seconds: to_unsigned(timeout_seconds, "timeout_seconds")?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

/// Convert a SQLite row to a Discussion
pub(crate) fn row_to_discussion(row: SqliteRow) -> Result<Discussion, Error> {
    let agent_ids: String = row.get("agent_ids");
    let status: String = row.get("status");
    let max_rounds: i64 = row.get("max_rounds");
    let max_char_limit: i64 = row.get("max_char_limit");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Discussion {
        id: row.get("id"),
        topic: row.get("topic"),
        agent_ids: parse_agent_ids(&agent_ids)?,
        moderator_id: row.get("moderator_id"),
        status: status.parse::<DiscussionStatus>().map_err(Error::Store)?,
        max_rounds: to_unsigned(max_rounds, "max_rounds")?,
        language: row.get("language"),
        max_char_limit: to_unsigned(max_char_limit, "max_char_limit")?,
        final_summary: row.get("final_summary"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

/// Convert a SQLite row to a DiscussionLog
pub(crate) fn row_to_log(row: SqliteRow) -> Result<DiscussionLog, Error> {
    let status: String = row.get("status");
    let response_time: i64 = row.get("response_time");
    let created_at: String = row.get("created_at");

    Ok(DiscussionLog {
        id: row.get("id"),
        discussion_id: row.get("discussion_id"),
        agent_id: row.get("agent_id"),
        content: row.get("content"),
        status: status.parse::<LogStatus>().map_err(Error::Store)?,
        response_time_ms: to_unsigned(response_time, "response_time")?,
        is_moderator: row.get("is_moderator"),
        created_at: parse_timestamp(&created_at)?,
    })
}

/// Clamp an unsigned value into a SQLite integer
pub(crate) fn to_db_int<T: TryInto<i64>>(value: T) -> i64 {
    value.try_into().unwrap_or(i64::MAX)
}

/// Get the default data directory for Roundtable
pub fn default_data_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .map(|p| p.join(".roundtable"))
        .unwrap_or_else(|| std::path::PathBuf::from(".roundtable"))
}

/// Get the default database path
pub fn default_db_path() -> std::path::PathBuf {
    default_data_dir().join("roundtable.db")
}
