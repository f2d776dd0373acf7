//! Handlers for `/clients` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/clients?clientType=PERSON\|COMPANY` | List one kind |
//! | `POST`   | `/clients` | Body is self-describing via its `type` tag |
//! | `GET`    | `/clients/:id?clientType=...` | 404 if not found |
//! | `PUT`    | `/clients/:id?clientType=...` | Partial update; immutable fields are ignored |
//! | `DELETE` | `/clients/:id?clientType=...` | Cascades to the client's contracts |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use dossier_core::{
  client::ClientKind,
  payload::{ClientPatch, ClientPayload},
  store::{CompanyStore, ContractStore, PersonStore},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct KindParam {
  #[serde(rename = "clientType")]
  pub client_type: ClientKind,
}

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /clients?clientType=<kind>`
pub async fn list<S>(
  State(state): State<Arc<ApiState<S>>>,
  Query(params): Query<KindParam>,
) -> Result<Json<Vec<ClientPayload>>, ApiError>
where
  S: PersonStore + CompanyStore + ContractStore,
{
  let clients = state
    .orchestrator
    .get_all_clients(params.client_type)
    .await?;
  Ok(Json(clients))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /clients` — the body carries its own `type` tag.
pub async fn create<S>(
  State(state): State<Arc<ApiState<S>>>,
  Json(payload): Json<ClientPayload>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PersonStore + CompanyStore + ContractStore,
{
  let created = state.orchestrator.create_client(payload).await?;
  Ok((StatusCode::CREATED, Json(created)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /clients/:id?clientType=<kind>`
pub async fn get_one<S>(
  State(state): State<Arc<ApiState<S>>>,
  Path(id): Path<Uuid>,
  Query(params): Query<KindParam>,
) -> Result<Json<ClientPayload>, ApiError>
where
  S: PersonStore + CompanyStore + ContractStore,
{
  let client = state
    .orchestrator
    .get_client_by_id(params.client_type, id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("client {id} not found")))?;
  Ok(Json(client))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /clients/:id?clientType=<kind>` — body is a partial patch of the
/// shared mutable fields.
pub async fn update<S>(
  State(state): State<Arc<ApiState<S>>>,
  Path(id): Path<Uuid>,
  Query(params): Query<KindParam>,
  Json(patch): Json<ClientPatch>,
) -> Result<Json<ClientPayload>, ApiError>
where
  S: PersonStore + CompanyStore + ContractStore,
{
  let updated = state
    .orchestrator
    .update_client(params.client_type, id, patch)
    .await?;
  Ok(Json(updated))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /clients/:id?clientType=<kind>`
pub async fn delete<S>(
  State(state): State<Arc<ApiState<S>>>,
  Path(id): Path<Uuid>,
  Query(params): Query<KindParam>,
) -> Result<StatusCode, ApiError>
where
  S: PersonStore + CompanyStore + ContractStore,
{
  state
    .orchestrator
    .delete_client(params.client_type, id)
    .await?;
  Ok(StatusCode::NO_CONTENT)
}
