//! JSON REST API for Dossier.
//!
//! Exposes an axum [`Router`] backed by any store implementing the three
//! `dossier_core` store traits. Auth, TLS, and transport concerns are the
//! caller's responsibility.
//!
//! Clients are addressed by `{clientType, id}` — the kind travels as the
//! `clientType` query parameter on every per-client route, matching the
//! self-describing `type` tag in payload bodies.

pub mod clients;
pub mod contracts;
pub mod error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, put},
};
use dossier_core::{
  orchestrator::ClientOrchestrator,
  resolver::ClientResolver,
  service::ContractService,
  store::{CompanyStore, ContractStore, PersonStore},
};
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8080 }
fn default_store_path() -> PathBuf { PathBuf::from("dossier.db") }

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers. One store type serves
/// all three store roles.
pub struct ApiState<S> {
  pub orchestrator: ClientOrchestrator<S, S>,
  pub contracts:    ContractService<S>,
  pub resolver:     ClientResolver<S, S>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: PersonStore + CompanyStore + ContractStore + 'static,
{
  Router::new()
    // Clients
    .route(
      "/clients",
      get(clients::list::<S>).post(clients::create::<S>),
    )
    .route(
      "/clients/{id}",
      get(clients::get_one::<S>)
        .put(clients::update::<S>)
        .delete(clients::delete::<S>),
    )
    // Contracts
    .route(
      "/contracts/client/{client_id}",
      get(contracts::list_active::<S>)
        .post(contracts::create_for_client::<S>),
    )
    .route(
      "/contracts/client/{client_id}/sum",
      get(contracts::sum_active::<S>),
    )
    .route("/contracts/{id}/cost", put(contracts::update_cost::<S>))
    .with_state(Arc::new(state))
}
