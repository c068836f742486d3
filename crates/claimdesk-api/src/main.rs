//! claimdesk-server binary.
//!
//! Reads `claimdesk.toml` (or the path specified with `--config`), layered
//! with `CLAIMDESK_*` environment variables, resolves the backend
//! configuration exactly once, opens the selected store, and serves the
//! JSON API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use claimdesk_api::{AppState, ServerConfig, router};
use claimdesk_core::{
  config::BackendKind, engine::RecommendationEngine, store::ClaimStore,
};
use claimdesk_store_postgres::PostgresStore;
use claimdesk_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Claimdesk API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "claimdesk.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("CLAIMDESK"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Fatal before any connection attempt or socket bind.
  server_cfg
    .backend
    .validate()
    .context("invalid backend configuration")?;

  let engine = RecommendationEngine::new(server_cfg.high_value_threshold);

  // The one and only place that branches on backend kind.
  match server_cfg.backend.kind {
    BackendKind::Embedded => {
      let path = &server_cfg.backend.store_path;
      let store = SqliteStore::open(path)
        .await
        .with_context(|| format!("failed to open store at {path:?}"))?;
      tracing::info!("Using embedded store at {path:?}");
      serve(store, engine, &server_cfg).await
    }
    BackendKind::Networked => {
      // validate() has guaranteed the URL is present for this kind.
      let url = server_cfg.backend.database_url.clone().unwrap_or_default();
      let store = PostgresStore::connect(&url)
        .await
        .context("failed to connect to PostgreSQL")?;
      tracing::info!("Using networked PostgreSQL store");
      serve(store, engine, &server_cfg).await
    }
  }
}

async fn serve<S>(
  store: S,
  engine: RecommendationEngine,
  cfg: &ServerConfig,
) -> anyhow::Result<()>
where
  S: ClaimStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let state = AppState {
    store:  Arc::new(store),
    engine: Arc::new(engine),
  };
  let app = router(state).layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", cfg.host, cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
