use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use todo_server::ServerConfig;
use todo_store::TodoRepo;
use todo_telemetry::TelemetryConfig;

/// Todo list HTTP API backed by a JSON file.
#[derive(Debug, Parser)]
#[command(name = "todo-api", version)]
struct Args {
    /// Address to bind.
    #[arg(long, env = "TODO_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on (0 picks a free port).
    #[arg(long, env = "TODO_PORT", default_value_t = 8080)]
    port: u16,

    /// JSON file holding the todo list.
    #[arg(long = "store", env = "TODO_STORE", default_value = "todos.json")]
    store_path: PathBuf,

    /// Default log level; RUST_LOG takes precedence.
    #[arg(long, env = "TODO_LOG_LEVEL", default_value = "info")]
    log_level: tracing::Level,

    /// Log as JSON lines.
    #[arg(long, env = "TODO_LOG_JSON")]
    log_json: bool,
}

impl Args {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            store_path: self.store_path.clone(),
        }
    }

    fn telemetry_config(&self) -> TelemetryConfig {
        TelemetryConfig {
            log_level: self.log_level,
            json: self.log_json,
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    todo_telemetry::init_telemetry(&args.telemetry_config())?;

    tracing::info!("Starting todo server");

    let config = args.server_config();
    let repo = TodoRepo::open(&config.store_path)
        .with_context(|| format!("failed to load todos from {}", config.store_path.display()))?;

    let handle = todo_server::start(&config, Arc::new(repo))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;

    tracing::info!(port = handle.port, "Todo server ready");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl+c")?;

    tracing::info!("Shutting down");
    handle.shutdown().await;
    Ok(())
}
