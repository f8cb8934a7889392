use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use pool_core::db::RepositoryRegistry;
use pool_db_sqlite::SqliteRepositoryFactory;
use pool_server::{AppState, ServerConfig, logging, router};
use tracing::{debug, info, warn};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Pool construction estimate service.
///
/// Serves the configurator API: pricing, saved estimates, clients and
/// document export. Flags override values from the configuration file.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// TOML configuration file. Defaults to `pool-server.toml` when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. `0.0.0.0:8080`.
    #[arg(long)]
    listen: Option<String>,

    /// Database backend to use.
    #[arg(long)]
    backend: Option<String>,

    /// Database connection string.
    /// For SQLite this is a file path (e.g. `estimates.db`) or `:memory:`.
    #[arg(long)]
    db: Option<String>,

    /// Directory for the client file and drafts.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `pool_server=trace,info`.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply(
        self,
        mut config: ServerConfig,
    ) -> ServerConfig {
        if let Some(listen) = self.listen {
            config.listen = listen;
        }
        if let Some(backend) = self.backend {
            config.db.backend = backend;
        }
        if let Some(db) = self.db {
            config.db.connection_string = db;
        }
        if let Some(data_dir) = self.data_dir {
            config.data_dir = data_dir;
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }
        config
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref())?;
    let config = cli.apply(config);

    logging::init_logging(&config.log_level);
    if let Some(path) = &config.log_file {
        if let Err(error) = logging::enable_file_logging(path) {
            warn!(%error, "File logging disabled");
        }
    }

    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));

    debug!("connecting to {} backend", config.db.backend);
    let repo = registry
        .create(&config.db)
        .await
        .with_context(|| format!("Failed to open {} database", config.db.backend))?;

    let state = AppState::new(Arc::from(repo), &config);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen))?;
    info!(
        listen = %config.listen,
        data_dir = %config.data_dir.display(),
        "Pool estimate server started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "Failed to listen for shutdown signal");
    }
}
