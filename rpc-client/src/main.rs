// File: rpc-client/src/main.rs
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use rpc_client::constants::defaults;
use rpc_client::types::hexstr_to_bytes;
use rpc_client::{ConfigManager, NodeType, RpcClient};

#[derive(Parser)]
#[command(name = "rpc-client", about = "Query and control a local node over its management API")]
struct Cli {
    /// Client configuration file
    #[arg(short, long, default_value = defaults::CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List peer connections
    Connections {
        /// Only show peers of this node type (1 = full node, 6 = wallet, ...)
        #[arg(long)]
        node_type: Option<u8>,
    },
    /// Open a connection to a peer
    Open { host: String, port: u16 },
    /// Close the connection to a peer by hex node id
    Close { node_id: String },
    /// Ask the node to shut down
    Stop,
    /// Check that the management API answers
    Healthz,
    /// POST a raw JSON body to any path
    Raw {
        path: String,
        #[arg(default_value = "{}")]
        body: String,
        /// Appended to the URL and used in retry logs
        #[arg(long, default_value = "")]
        correlation_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("rpc_client=info".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("rustls=warn".parse()?);

    fmt().with_env_filter(env_filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let config_manager = ConfigManager::load(&cli.config)
        .await
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    let config = config_manager.get_current_config();

    let mut client = RpcClient::create_with_policy(
        &config.self_hostname,
        config.port,
        &config.root_path,
        &config.network,
        config.retry.policy(),
    )
    .context("Failed to create RPC client")?;

    let outcome = run(&client, cli.command).await;

    client.close();
    client.await_closed().await;

    // errors go back to the runtime, which prints them once
    println!("{}", render(outcome)?);
    Ok(())
}

fn render(outcome: Result<Value>) -> Result<String> {
    let value = outcome?;
    Ok(serde_json::to_string_pretty(&value)?)
}

async fn run(client: &RpcClient, command: Command) -> Result<Value> {
    let value = match command {
        Command::Connections { node_type } => {
            let node_type = node_type
                .map(NodeType::try_from)
                .transpose()
                .map_err(|e| anyhow!(e))?;
            let connections = client.get_connections(node_type).await?;
            info!("{} connections", connections.len());
            serde_json::to_value(connections)?
        }
        Command::Open { host, port } => client.open_connection(&host, port).await?.into_value(),
        Command::Close { node_id } => {
            let node_id = hexstr_to_bytes(&node_id).context("node id must be hex")?;
            client.close_connection(&node_id).await?.into_value()
        }
        Command::Stop => client.stop_node().await?.into_value(),
        Command::Healthz => client.healthz().await?.into_value(),
        Command::Raw {
            path,
            body,
            correlation_id,
        } => {
            let body: Value = serde_json::from_str(&body).context("body must be JSON")?;
            if correlation_id.is_empty() {
                info!("Raw request to {}", path);
            } else {
                info!("Raw request to {} with correlation id {}", path, correlation_id);
            }
            client.fetch(&path, body, &correlation_id).await?.into_value()
        }
    };

    Ok(value)
}
