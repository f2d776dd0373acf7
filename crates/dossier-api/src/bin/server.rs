//! dossier-api server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the client-and-contract JSON API
//! over HTTP.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use dossier_api::{ApiState, ServerConfig, api_router};
use dossier_core::{
  handler::{ClientHandler, CompanyHandler, PersonHandler},
  orchestrator::ClientOrchestrator,
  registry::HandlerRegistry,
  resolver::ClientResolver,
  service::{CompanyService, ContractService, PersonService},
};
use dossier_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Dossier client records server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
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
    .add_source(config::Environment::with_prefix("DOSSIER"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Wire the dispatch stack: services, handlers, registry, resolver.
  let persons = PersonService::new(store.clone());
  let companies = CompanyService::new(store.clone());
  let contracts = ContractService::new(store.clone());

  let registry = HandlerRegistry::new(vec![
    ClientHandler::Person(PersonHandler::new(persons.clone())),
    ClientHandler::Company(CompanyHandler::new(companies.clone())),
  ])
  .context("failed to build handler registry")?;
  let resolver = ClientResolver::new(persons, companies);
  let orchestrator = ClientOrchestrator::new(registry, resolver.clone());

  let state = ApiState { orchestrator, contracts, resolver };
  let app = api_router(state).layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
