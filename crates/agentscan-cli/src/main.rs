use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::env;
use std::sync::Arc;

use agentscan::auth::StaticToken;
use agentscan::client::{AgentscanClient, ClientConfig};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "agentscan", author, version, about = "Terminal explorer for the agentscan agent ecosystem", long_about = None)]
struct Cli {
    /// Base URL of the agentscan API (can also be set via AGENTSCAN_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Team identifier attached to conversation requests (can also be set
    /// via AGENTSCAN_TEAM_ID)
    #[arg(long)]
    team_id: Option<String>,

    /// Bearer token for authenticated requests (can also be set via
    /// AGENTSCAN_ACCESS_TOKEN); anonymous requests share a free quota
    #[arg(long)]
    access_token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Chat with the explorer, or with a specific agent instance
    Chat {
        /// Agent instance to address; omit for the general explorer chat
        #[arg(long)]
        instance: Option<String>,
    },
    /// Browse recently active agents
    Agents,
    /// Browse on-chain transactions made by agents
    Transactions {
        /// Restrict to a single chain (e.g. gnosis, base)
        #[arg(long)]
        chain: Option<String>,
    },
    /// List deployed instances of an agent
    Instances {
        agent_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let client = build_client(&cli)?;

    match cli.command {
        Command::Chat { instance } => commands::chat::run(client, instance).await,
        Command::Agents => commands::agents::run(client).await,
        Command::Transactions { chain } => commands::transactions::run(client, chain).await,
        Command::Instances { agent_id } => commands::instances::run(client, agent_id).await,
    }
}

fn build_client(cli: &Cli) -> Result<AgentscanClient> {
    let api_url = cli
        .api_url
        .clone()
        .or_else(|| env::var("AGENTSCAN_API_URL").ok())
        .context("API URL must be provided via --api-url or AGENTSCAN_API_URL environment variable")?;
    let team_id = cli
        .team_id
        .clone()
        .or_else(|| env::var("AGENTSCAN_TEAM_ID").ok());
    let access_token = cli
        .access_token
        .clone()
        .or_else(|| env::var("AGENTSCAN_ACCESS_TOKEN").ok());

    let mut config = ClientConfig::new(api_url);
    if let Some(team_id) = team_id {
        config = config.with_team_id(team_id);
    }

    let tokens = match access_token {
        Some(token) => StaticToken::new(token),
        None => StaticToken::anonymous(),
    };

    Ok(AgentscanClient::new(config)?.with_tokens(Arc::new(tokens)))
}
