//! Estate daemon: entry point for running an estate node.
//!
//! Reads one JSON command per line from stdin and writes one JSON reply per
//! line to stdout. Logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use estate_node::shutdown::wait_for_shutdown;
use estate_node::{init_logging, Command, CommandReply, EstateNode, NodeConfig, ShutdownController};
use estate_types::{ErrorKind, Identity, SystemClock};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Parser)]
#[command(name = "estate-daemon", about = "Property registry and valuation daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "ESTATE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the state snapshot.
    #[arg(long, env = "ESTATE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Registry administrator identity.
    #[arg(long, env = "ESTATE_ADMINISTRATOR")]
    administrator: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "ESTATE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "ESTATE_LOG_FORMAT")]
    log_format: Option<String>,

    /// Skip the snapshot normally written on shutdown.
    #[arg(long, env = "ESTATE_NO_SNAPSHOT")]
    no_snapshot: bool,

    #[command(subcommand)]
    command: Subcommand,
}

#[derive(clap::Subcommand)]
enum Subcommand {
    /// Serve commands from stdin until EOF or a shutdown signal.
    Run,
    /// Print the effective configuration as TOML and exit.
    PrintConfig,
}

impl Cli {
    fn node_config(&self) -> anyhow::Result<NodeConfig> {
        let mut config = match &self.config {
            Some(path) => NodeConfig::from_toml_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => NodeConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(admin) = &self.administrator {
            config.administrator = Identity::new(admin.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.log_format = format.clone();
        }
        if self.no_snapshot {
            config.snapshot_on_shutdown = false;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.node_config()?;

    match cli.command {
        Subcommand::PrintConfig => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
        Subcommand::Run => {
            init_logging(config.log_format()?, &config.log_level)?;
            run(config).await
        }
    }
}

async fn run(config: NodeConfig) -> anyhow::Result<()> {
    tracing::info!(
        data_dir = %config.data_dir.display(),
        administrator = %config.administrator,
        workflow_writer = %config.workflow_writer,
        "starting estate node"
    );
    let snapshot_on_shutdown = config.snapshot_on_shutdown;
    let node = EstateNode::open(config, Arc::new(SystemClock)).context("opening node")?;

    let shutdown = Arc::new(ShutdownController::new());
    let signals = Arc::clone(&shutdown);
    tokio::spawn(async move {
        if let Err(e) = signals.wait_for_signal().await {
            tracing::warn!(error = %e, "signal handler failed");
        }
    });
    let mut stop = shutdown.subscribe();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            _ = wait_for_shutdown(&mut stop) => break,
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    tracing::info!("stdin closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let reply = handle_line(&node, &line).await;
                let mut out = serde_json::to_string(&reply)?;
                out.push('\n');
                stdout.write_all(out.as_bytes()).await?;
                stdout.flush().await?;
            }
        }
    }

    if snapshot_on_shutdown {
        node.save_snapshot().await.context("writing shutdown snapshot")?;
    }
    tracing::info!(
        records = node.metrics().record_count.get(),
        "estate daemon exited cleanly"
    );
    Ok(())
}

async fn handle_line(node: &EstateNode, line: &str) -> CommandReply {
    match serde_json::from_str::<Command>(line) {
        Ok(command) => node.execute(command).await,
        Err(e) => {
            tracing::debug!(error = %e, "malformed command line");
            CommandReply::Error {
                kind: ErrorKind::Validation,
                message: format!("malformed command: {e}"),
            }
        }
    }
}
