//! Agent commands
//!
//! Operate on the configured database without starting the server.

use anyhow::{Context, Result};
use roundtable_core::DebateStore;
use roundtable_llm::util::mask_api_key;

use crate::server::{build_engine, load_config};

/// Print every configured agent
pub async fn list() -> Result<()> {
    let config = load_config()?;
    let engine = build_engine(&config).await?;
    let agents = engine
        .store()
        .list_agents()
        .await
        .context("Failed to list agents")?;

    if agents.is_empty() {
        println!("No agents configured.");
        return Ok(());
    }

    println!("{:<6} {:<24} {:<10} {:<24} {:<8} URL", "ID", "NAME", "KIND", "MODEL", "TIMEOUT");
    for agent in agents {
        println!(
            "{:<6} {:<24} {:<10} {:<24} {:<8} {}{}",
            agent.id,
            agent.name,
            agent.kind().to_string(),
            agent.model_name,
            format!("{}s", agent.timeout_seconds),
            agent.provider_url,
            agent
                .api_token
                .as_deref()
                .map(|t| format!(" (token {})", mask_api_key(t)))
                .unwrap_or_default(),
        );
    }
    Ok(())
}

/// Ping one agent and report the outcome
pub async fn ping(agent_id: i64) -> Result<()> {
    let config = load_config()?;
    let engine = build_engine(&config).await?;
    let agent = engine
        .store()
        .get_agent(agent_id)
        .await
        .with_context(|| format!("Agent {agent_id} not found"))?;

    let started = std::time::Instant::now();
    engine
        .ping_participant(agent_id)
        .await
        .with_context(|| format!("{} ({}) is not reachable", agent.name, agent.provider_url))?;

    println!(
        "{} ({}) is reachable [{} ms]",
        agent.name,
        agent.kind(),
        started.elapsed().as_millis()
    );
    Ok(())
}
