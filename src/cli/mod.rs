//! CLI module for Roundtable
//!
//! Provides commands:
//! - `serve`: Run the HTTP server (default)
//! - `agents`: List configured agents
//! - `ping`: Check an agent's provider is reachable

use clap::{Parser, Subcommand};

pub mod agents;

/// Roundtable multi-agent debate server
#[derive(Parser, Debug)]
#[command(name = "roundtable")]
#[command(about = "Multi-agent debate orchestration server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the server (default)
    Serve,
    /// List configured agents
    Agents,
    /// Check that an agent's provider answers
    Ping {
        /// Agent id
        agent_id: i64,
    },
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Serve) | None => crate::server::run().await,
        Some(Commands::Agents) => agents::list().await,
        Some(Commands::Ping { agent_id }) => agents::ping(agent_id).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cli = Cli::try_parse_from(["roundtable"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["roundtable", "ping", "7"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Ping { agent_id: 7 })));

        assert!(Cli::try_parse_from(["roundtable", "ping", "seven"]).is_err());
    }
}
