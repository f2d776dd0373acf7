//! Handlers for `/contracts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/contracts/client/:client_id?clientType=...&updatedAfter=...` | Active contracts |
//! | `POST` | `/contracts/client/:client_id?clientType=...` | 404 unless the client exists |
//! | `GET`  | `/contracts/client/:client_id/sum?clientType=...` | Total active cost |
//! | `PUT`  | `/contracts/:id/cost` | Body: `{"cost_amount": 250.0}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, NaiveDate, Utc};
use dossier_core::{
  client::ClientKind,
  contract::{Contract, NewContract},
  store::{CompanyStore, ContractStore, PersonStore},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{ApiState, clients::KindParam, error::ApiError};

// ─── List active ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ActiveParams {
  #[serde(rename = "clientType")]
  pub client_type:   ClientKind,
  /// Optional cutoff; only contracts modified strictly after it are
  /// returned. Absent means no modification-time filter.
  #[serde(default, rename = "updatedAfter")]
  pub updated_after: Option<DateTime<Utc>>,
}

/// `GET /contracts/client/:client_id?clientType=<kind>[&updatedAfter=<ts>]`
pub async fn list_active<S>(
  State(state): State<Arc<ApiState<S>>>,
  Path(client_id): Path<Uuid>,
  Query(params): Query<ActiveParams>,
) -> Result<Json<Vec<Contract>>, ApiError>
where
  S: PersonStore + CompanyStore + ContractStore,
{
  let client = state
    .resolver
    .resolve(params.client_type, client_id)
    .await?
    .ok_or_else(|| {
      ApiError::NotFound(format!("client {client_id} not found"))
    })?;

  let contracts = state
    .contracts
    .get_active_contracts(&client, params.updated_after)
    .await?;
  Ok(Json(contracts))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  #[serde(default)]
  pub start_date:  Option<NaiveDate>,
  #[serde(default)]
  pub end_date:    Option<NaiveDate>,
  pub cost_amount: f64,
}

/// `POST /contracts/client/:client_id?clientType=<kind>`
pub async fn create_for_client<S>(
  State(state): State<Arc<ApiState<S>>>,
  Path(client_id): Path<Uuid>,
  Query(params): Query<KindParam>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PersonStore + CompanyStore + ContractStore,
{
  state
    .orchestrator
    .validate_client_exists(params.client_type, client_id)
    .await?;

  let contract = state
    .contracts
    .create_contract(NewContract {
      client_id,
      start_date: body.start_date,
      end_date: body.end_date,
      cost_amount: body.cost_amount,
    })
    .await?;
  Ok((StatusCode::CREATED, Json(contract)))
}

// ─── Sum ─────────────────────────────────────────────────────────────────────

/// `GET /contracts/client/:client_id/sum?clientType=<kind>`
pub async fn sum_active<S>(
  State(state): State<Arc<ApiState<S>>>,
  Path(client_id): Path<Uuid>,
  Query(params): Query<KindParam>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: PersonStore + CompanyStore + ContractStore,
{
  let client = state
    .resolver
    .resolve(params.client_type, client_id)
    .await?
    .ok_or_else(|| {
      ApiError::NotFound(format!("client {client_id} not found"))
    })?;

  let total = state
    .contracts
    .get_total_active_contracts_amount(&client)
    .await?;
  Ok(Json(json!({ "total": total })))
}

// ─── Update cost ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CostBody {
  pub cost_amount: f64,
}

/// `PUT /contracts/:id/cost` — body: `{"cost_amount": 250.0}`
pub async fn update_cost<S>(
  State(state): State<Arc<ApiState<S>>>,
  Path(id): Path<Uuid>,
  Json(body): Json<CostBody>,
) -> Result<Json<Contract>, ApiError>
where
  S: PersonStore + CompanyStore + ContractStore,
{
  let contract = state
    .contracts
    .find_by_id(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("contract {id} not found")))?;

  let updated = state
    .contracts
    .update_contract_cost(contract, body.cost_amount)
    .await?;
  Ok(Json(updated))
}
