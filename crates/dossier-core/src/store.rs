//! Store traits implemented by persistence backends.
//!
//! The traits are implemented by storage backends (e.g.
//! `dossier-store-sqlite`). Services and handlers depend on these
//! abstractions, not on any concrete backend.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
  client::{Company, CompanyIdentifier, Person},
  contract::Contract,
};

// ─── Person store ────────────────────────────────────────────────────────────

/// Persistence collaborator for person clients.
pub trait PersonStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn find_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  fn find_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Insert or overwrite the person row.
  fn save(
    &self,
    person: Person,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove the person together with their contracts, as one atomic unit.
  ///
  /// Active contracts are closed (end date = today) before the rows are
  /// removed, inside the same transaction: either everything commits or
  /// nothing does. Contracts never survive their client.
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Company store ───────────────────────────────────────────────────────────

/// Persistence collaborator for company clients.
pub trait CompanyStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn find_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Company>, Self::Error>> + Send + '_;

  fn find_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Company>, Self::Error>> + Send + '_;

  /// Natural-key existence check, used to enforce identifier uniqueness
  /// before any save.
  fn exists_by_identifier(
    &self,
    identifier: CompanyIdentifier,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Insert or overwrite the company row.
  fn save(
    &self,
    company: Company,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove the company together with its contracts, as one atomic unit.
  /// Same semantics as [`PersonStore::delete`].
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Contract store ──────────────────────────────────────────────────────────

/// Persistence collaborator for contracts.
pub trait ContractStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn find_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Contract>, Self::Error>> + Send + '_;

  /// Active contracts for a client, as of `today`.
  ///
  /// `updated_after = None` means no modification-time filter; `Some`
  /// restricts to contracts whose `last_modified` strictly exceeds the
  /// cutoff. Both call paths share this one method so they cannot disagree
  /// on the null-cutoff semantics.
  fn find_active_for_client(
    &self,
    client_id: Uuid,
    today: NaiveDate,
    updated_after: Option<DateTime<Utc>>,
  ) -> impl Future<Output = Result<Vec<Contract>, Self::Error>> + Send + '_;

  /// Sum of `cost_amount` over the client's active contracts; zero when
  /// there are none.
  fn sum_active_cost(
    &self,
    client_id: Uuid,
    today: NaiveDate,
  ) -> impl Future<Output = Result<f64, Self::Error>> + Send + '_;

  /// Insert or overwrite the contract row.
  fn save(
    &self,
    contract: Contract,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Persist a batch of contracts; all rows or none.
  fn save_all(
    &self,
    contracts: Vec<Contract>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
