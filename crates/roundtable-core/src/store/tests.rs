//! Tests for store module
//!
//! Each scenario runs against both backends.

use super::helpers::parse_agent_ids;
use super::*;
use crate::error::Error;
use crate::models::{Agent, Discussion, DiscussionLog, DiscussionStatus, LogStatus};
use roundtable_llm::ProviderKind;
use tokio_test::{assert_err, assert_ok};

async fn backends() -> Vec<Box<dyn DebateStore>> {
    vec![
        Box::new(InMemoryStore::new()),
        Box::new(SqliteStore::in_memory().await.unwrap()),
    ]
}

async fn seed_agent(store: &dyn DebateStore, name: &str) -> Agent {
    store
        .insert_agent(Agent::new(name, "http://localhost:11434", "llama3").with_kind(ProviderKind::Ollama))
        .await
        .unwrap()
}

#[test]
fn test_parse_agent_ids() {
    assert_eq!(parse_agent_ids("[3,1,3]").unwrap(), vec![3, 1, 3]);
    assert_eq!(parse_agent_ids("4, 5,6").unwrap(), vec![4, 5, 6]);
    assert_eq!(parse_agent_ids("").unwrap(), Vec::<i64>::new());
    assert!(parse_agent_ids("[1,").is_err());
}

#[test]
fn test_default_db_path() {
    assert!(default_db_path().to_string_lossy().contains("roundtable"));
}

#[tokio::test]
async fn test_agent_crud() {
    for store in backends().await {
        let store = store.as_ref();
        let agent = store
            .insert_agent(
                Agent::new("Skeptic", "https://api.openai.com/v1", "gpt-4o")
                    .with_kind(ProviderKind::OpenAi)
                    .with_token("sk-test")
                    .with_timeout_seconds(45),
            )
            .await
            .unwrap();
        assert!(agent.id > 0, "{}", store.name());

        let fetched = store.get_agent(agent.id).await.unwrap();
        assert_eq!(fetched.name, "Skeptic");
        assert_eq!(fetched.provider_type, Some(ProviderKind::OpenAi));
        assert_eq!(fetched.api_token.as_deref(), Some("sk-test"));
        assert_eq!(fetched.timeout_seconds, 45);

        let mut changed = fetched.clone();
        changed.model_name = "gpt-4o-mini".to_string();
        let updated = store.update_agent(&changed).await.unwrap();
        assert_eq!(updated.model_name, "gpt-4o-mini");

        seed_agent(store, "Optimist").await;
        assert_eq!(store.list_agents().await.unwrap().len(), 2);

        assert_ok!(store.delete_agent(agent.id).await);
        assert!(matches!(
            store.get_agent(agent.id).await,
            Err(Error::AgentNotFound(_))
        ));
        assert_err!(store.delete_agent(agent.id).await);
    }
}

#[tokio::test]
async fn test_discussion_roundtrip_keeps_duplicates() {
    for store in backends().await {
        let store = store.as_ref();
        let a = seed_agent(store, "A").await;
        let b = seed_agent(store, "B").await;

        let mut request = Discussion::new("Is Rust fun?", vec![a.id, b.id, a.id]);
        request.moderator_id = Some(b.id);
        request.max_rounds = 2;
        request.language = "Korean".to_string();
        request.max_char_limit = 500;

        let stored = store.insert_discussion(request).await.unwrap();
        let fetched = store.get_discussion(stored.id).await.unwrap();
        assert_eq!(fetched.agent_ids, vec![a.id, b.id, a.id], "{}", store.name());
        assert_eq!(fetched.moderator_id, Some(b.id));
        assert_eq!(fetched.status, DiscussionStatus::Running);
        assert_eq!(fetched.max_rounds, 2);
        assert_eq!(fetched.language, "Korean");
        assert_eq!(fetched.max_char_limit, 500);
    }
}

#[tokio::test]
async fn test_status_never_moves_backward() {
    for store in backends().await {
        let store = store.as_ref();
        let a = seed_agent(store, "A").await;
        let mut discussion = store
            .insert_discussion(Discussion::new("topic", vec![a.id]))
            .await
            .unwrap();

        discussion.status = DiscussionStatus::Completed;
        discussion.final_summary = "done".to_string();
        assert_ok!(store.update_discussion(&discussion).await);

        // Same status, new summary: allowed
        discussion.final_summary = "done again".to_string();
        let updated = store.update_discussion(&discussion).await.unwrap();
        assert_eq!(updated.final_summary, "done again");

        for backward in [DiscussionStatus::Running, DiscussionStatus::Failed] {
            discussion.status = backward;
            assert!(
                matches!(
                    store.update_discussion(&discussion).await,
                    Err(Error::InvalidRequest(_))
                ),
                "{} accepted completed -> {}",
                store.name(),
                backward
            );
        }
        let current = store.get_discussion(discussion.id).await.unwrap();
        assert_eq!(current.status, DiscussionStatus::Completed);
    }
}

#[tokio::test]
async fn test_close_discussion_only_once() {
    for store in backends().await {
        let store = store.as_ref();
        let a = seed_agent(store, "A").await;
        let discussion = store
            .insert_discussion(Discussion::new("topic", vec![a.id]))
            .await
            .unwrap();

        let closed = store
            .close_discussion(discussion.id, DiscussionStatus::Completed)
            .await
            .unwrap();
        assert_eq!(closed.status, DiscussionStatus::Completed, "{}", store.name());

        for status in [DiscussionStatus::Completed, DiscussionStatus::Failed] {
            assert!(
                matches!(
                    store.close_discussion(discussion.id, status).await,
                    Err(Error::NotRunning(_))
                ),
                "{} closed a completed discussion again",
                store.name()
            );
        }
        assert!(matches!(
            store.close_discussion(9999, DiscussionStatus::Completed).await,
            Err(Error::DiscussionNotFound(9999))
        ));
    }
}

#[tokio::test]
async fn test_logs_in_insertion_order() {
    for store in backends().await {
        let store = store.as_ref();
        let a = seed_agent(store, "A").await;
        let b = seed_agent(store, "B").await;
        let d = store
            .insert_discussion(Discussion::new("topic", vec![a.id, b.id]))
            .await
            .unwrap();

        for (agent, content) in [(a.id, "first"), (b.id, "second"), (a.id, "third")] {
            store
                .insert_discussion_log(DiscussionLog::new(d.id, agent, LogStatus::Success, content, 5))
                .await
                .unwrap();
        }
        store
            .insert_discussion_log(
                DiscussionLog::new(d.id, b.id, LogStatus::Error, "Moderator Error: x", 9).as_moderator(),
            )
            .await
            .unwrap();

        let logs = store.list_discussion_logs(d.id).await.unwrap();
        let contents: Vec<&str> = logs.iter().map(|l| l.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third", "Moderator Error: x"]);
        assert!(logs.windows(2).all(|w| w[0].id < w[1].id));
        assert!(logs[3].is_moderator);
        assert_eq!(logs[3].status, LogStatus::Error);
        assert_eq!(logs[3].response_time_ms, 9);
    }
}

#[tokio::test]
async fn test_delete_discussion_drops_logs() {
    for store in backends().await {
        let store = store.as_ref();
        let a = seed_agent(store, "A").await;
        let d = store
            .insert_discussion(Discussion::new("topic", vec![a.id]))
            .await
            .unwrap();
        store
            .insert_discussion_log(DiscussionLog::new(d.id, a.id, LogStatus::Success, "x", 1))
            .await
            .unwrap();

        assert_ok!(store.delete_discussion(d.id).await);
        assert!(store.list_discussion_logs(d.id).await.unwrap().is_empty());
        assert!(matches!(
            store.get_discussion(d.id).await,
            Err(Error::DiscussionNotFound(_))
        ));
    }
}

#[tokio::test]
async fn test_sqlite_file_store() {
    let dir = std::env::temp_dir().join(format!("roundtable-test-{}", uuid::Uuid::new_v4()));
    let path = dir.join("debates.db");

    {
        let store = SqliteStore::from_path(&path).await.unwrap();
        seed_agent(&store, "Persistent").await;
    }

    let reopened = SqliteStore::from_path(&path).await.unwrap();
    let agents = reopened.list_agents().await.unwrap();
    assert_eq!(agents.len(), 1);
    assert_eq!(agents[0].name, "Persistent");

    let _ = std::fs::remove_dir_all(dir);
}
