//! Error types for `dossier-core`.
//!
//! Every failure condition a caller may want to map to an external signal
//! gets its own variant; storage faults are wrapped uninterpreted.

use thiserror::Error;
use uuid::Uuid;

use crate::client::ClientKind;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unsupported client kind {requested}; registered kinds: {registered:?}")]
  UnsupportedClientKind {
    requested:  ClientKind,
    registered: Vec<ClientKind>,
  },

  #[error("duplicate handler registered for client kind {0}")]
  DuplicateHandler(ClientKind),

  #[error("{kind} client not found: {id}")]
  ClientNotFound { kind: ClientKind, id: Uuid },

  #[error("contract not found: {0}")]
  ContractNotFound(Uuid),

  #[error("expected a {expected} payload but got {got}")]
  PayloadKindMismatch { expected: ClientKind, got: ClientKind },

  #[error("company identifier already exists: {0}")]
  DuplicateCompanyIdentifier(String),

  #[error("invalid company identifier {0:?}: expected the form 'aaa-123'")]
  InvalidCompanyIdentifier(String),

  #[error("a birthdate is required to create a person")]
  MissingBirthdate,

  #[error("a company identifier is required to create a company")]
  MissingCompanyIdentifier,

  #[error("contract cost must not be negative: {0}")]
  NegativeCost(f64),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a storage-backend error without interpreting it.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
