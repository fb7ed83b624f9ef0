//! snipboxd — the snipbox daemon.
//!
//! Serves the snippet API and the static frontend from one process, and
//! carries the administrative `init-db` command.
//!
//! # Usage
//!
//! ```text
//! snipboxd serve --port 8000 --database snippets.db --static-dir static
//! snipboxd init-db --database snippets.db
//! ```

mod bootstrap;
mod config;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use snipbox_api::StaticAssets;
use snipbox_store::Store;
use tracing::{error, info};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "snipboxd", about = "snipbox snippet-sharing daemon", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the API and frontend. Creates the database on first run.
    Serve {
        #[command(flatten)]
        common: CommonArgs,

        /// Interface to bind.
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on.
        #[arg(long)]
        port: Option<u16>,

        /// Directory holding the frontend files.
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
    /// Create the database schema, deleting any existing data after confirmation.
    InitDb {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// SQLite database file.
    #[arg(long)]
    database: Option<PathBuf>,
}

impl CommonArgs {
    fn load(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(database) = &self.database {
            config.database = database.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "info,snipboxd=debug,snipbox_api=debug,snipbox_store=debug",
                )
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            common,
            host,
            port,
            static_dir,
        } => {
            let mut config = common.load()?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(static_dir) = static_dir {
                config.static_dir = static_dir;
            }
            run_server(config).await
        }
        Command::InitDb { common } => {
            let config = common.load()?;
            let store = Store::new(&config.database);
            let stdin = std::io::stdin();
            bootstrap::init_db_command(&store, stdin.lock(), std::io::stdout())?;
            Ok(())
        }
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    info!("snipbox daemon starting");

    let store = Store::new(&config.database);
    bootstrap::ensure_initialized(&store)?;
    info!(database = %store, "store ready");

    let assets = StaticAssets::new(&config.static_dir, config.entry_file.as_str());
    if !assets.entry_path().is_file() {
        error!(path = ?assets.entry_path(), "entry file missing, frontend routes will return 404");
    }

    let router = snipbox_api::build_router(store, assets);
    let addr = config.bind_addr()?;

    info!(%addr, "API server starting");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("shutdown signal received"),
                Err(e) => {
                    error!(error = %e, "failed to install CTRL+C handler");
                    std::future::pending::<()>().await;
                }
            }
        })
        .await?;

    info!("snipbox daemon stopped");
    Ok(())
}
