//! CLI front end for the CRUD agent
//!
//! Usage:
//!   crud-agent "create user with name John and email john@example.com"
//!   crud-agent --offline --seed seed.json "list all contacts"
//!   echo "get user with id 507f1f77bcf86cd799439011" | crud-agent --stdin
//!
//! Each request prints its result envelope as one JSON document.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crud_agent::agentic::AgentBackend;
use crud_agent::{Agent, AgentConfig, Collection};

#[derive(Parser)]
#[command(name = "crud-agent")]
#[command(about = "Run natural-language CRUD requests against a document store")]
struct Args {
    /// Request text
    text: Vec<String>,

    /// Read requests from stdin, one per line
    #[arg(long, conflicts_with = "text")]
    stdin: bool,

    /// JSON file to preload into the store
    #[arg(long, env = "SEED_FILE")]
    seed: Option<PathBuf>,

    /// Skip the model and use deterministic extraction only
    #[arg(long)]
    offline: bool,

    /// Print the whole resolved command instead of just the envelope
    #[arg(long)]
    show_command: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// List registered collections and exit
    #[arg(long)]
    list_collections: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.list_collections {
        for collection in Collection::ALL {
            let fields: Vec<&str> = collection.descriptor().fields.iter().map(|f| f.name).collect();
            println!("{}: {}", collection.name(), fields.join(", "));
        }
        return Ok(());
    }

    let mut config = AgentConfig::from_env()?;
    if args.offline {
        config.backend = AgentBackend::None;
    }
    if args.seed.is_some() {
        config.seed_file = args.seed.clone();
    }

    let requests = if args.stdin {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read requests from stdin")?;
        input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        vec![args.text.join(" ")]
    };
    if requests.iter().all(|r| r.trim().is_empty()) {
        bail!("No request given; pass the request text or use --stdin");
    }

    let agent = Agent::open(&config).await?;
    for request in &requests {
        let command = agent.process(request).await;
        let output = if args.show_command {
            serde_json::to_value(&command)?
        } else {
            command
                .result
                .as_ref()
                .map(|envelope| envelope.to_json())
                .unwrap_or_default()
        };
        if args.pretty {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", output);
        }
    }
    agent.close().await;
    Ok(())
}
