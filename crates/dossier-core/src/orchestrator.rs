//! The façade coordinating handler dispatch, partial-update merging, and
//! cross-entity deletion.
//!
//! Every operation resolves a handler through the registry first and fails
//! immediately when the requested kind has none.

use uuid::Uuid;

use crate::{
  Error, Result,
  client::ClientKind,
  payload::{ClientPatch, ClientPayload},
  registry::HandlerRegistry,
  resolver::ClientResolver,
  store::{CompanyStore, PersonStore},
};

pub struct ClientOrchestrator<PS, CS> {
  registry: HandlerRegistry<PS, CS>,
  resolver: ClientResolver<PS, CS>,
}

impl<PS: PersonStore, CS: CompanyStore> ClientOrchestrator<PS, CS> {
  pub fn new(
    registry: HandlerRegistry<PS, CS>,
    resolver: ClientResolver<PS, CS>,
  ) -> Self {
    Self { registry, resolver }
  }

  pub async fn get_all_clients(
    &self,
    kind: ClientKind,
  ) -> Result<Vec<ClientPayload>> {
    self.registry.resolve(kind)?.get_all().await
  }

  pub async fn get_client_by_id(
    &self,
    kind: ClientKind,
    id: Uuid,
  ) -> Result<Option<ClientPayload>> {
    self.registry.resolve(kind)?.get_by_id(id).await
  }

  /// Create a client. The payload is self-describing: the variant is read
  /// from the payload itself, not from a separate parameter.
  pub async fn create_client(
    &self,
    payload: ClientPayload,
  ) -> Result<ClientPayload> {
    let handler = self.registry.resolve(payload.kind())?;
    let created = handler.create(payload).await?;
    tracing::info!(kind = %created.kind(), "created client");
    Ok(created)
  }

  /// Update the shared mutable fields of an existing client.
  ///
  /// The existing payload is fetched, the patch is merged field-wise
  /// (a present field wins, an absent one keeps the stored value), and the
  /// variant-immutable fields are unconditionally masked before
  /// delegating. The handler's own update path ignores those fields too;
  /// the masking here is a second, independent enforcement point.
  pub async fn update_client(
    &self,
    kind: ClientKind,
    id: Uuid,
    patch: ClientPatch,
  ) -> Result<ClientPayload> {
    let handler = self.registry.resolve(kind)?;
    let existing = handler
      .get_by_id(id)
      .await?
      .ok_or(Error::ClientNotFound { kind, id })?;

    let mut merged = existing.merged_with(&patch);
    merged.clear_immutable_fields();

    handler.update(id, merged).await
  }

  /// Fail with `ClientNotFound` when `{kind, id}` resolves to nothing.
  /// Callers are expected to invoke this before mutating operations.
  pub async fn validate_client_exists(
    &self,
    kind: ClientKind,
    id: Uuid,
  ) -> Result<()> {
    self
      .resolver
      .resolve(kind, id)
      .await?
      .map(|_| ())
      .ok_or(Error::ClientNotFound { kind, id })
  }

  /// Delete a client together with its contracts.
  ///
  /// The live entity is resolved first so a missing client fails
  /// explicitly. Contract closure and row removal then execute inside the
  /// single store transaction behind the handler's delete: active
  /// contracts are closed before anything is removed, and the whole unit
  /// commits or rolls back together.
  pub async fn delete_client(&self, kind: ClientKind, id: Uuid) -> Result<()> {
    let handler = self.registry.resolve(kind)?;
    let client = self
      .resolver
      .resolve(kind, id)
      .await?
      .ok_or(Error::ClientNotFound { kind, id })?;

    handler.delete(client.id()).await?;
    tracing::info!(kind = %kind, %id, "deleted client");
    Ok(())
  }
}
