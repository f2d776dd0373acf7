//! Resolves a client entity from `{kind, id}` without the caller knowing
//! which store to query.
//!
//! Exists so that cross-variant coordination (contract closure on deletion,
//! existence checks) can work with the base [`Client`] view instead of the
//! full payload path.

use uuid::Uuid;

use crate::{
  Result,
  client::{Client, ClientKind},
  service::{CompanyService, PersonService},
  store::{CompanyStore, PersonStore},
};

#[derive(Clone)]
pub struct ClientResolver<PS, CS> {
  persons:   PersonService<PS>,
  companies: CompanyService<CS>,
}

impl<PS: PersonStore, CS: CompanyStore> ClientResolver<PS, CS> {
  pub fn new(
    persons: PersonService<PS>,
    companies: CompanyService<CS>,
  ) -> Self {
    Self { persons, companies }
  }

  /// Resolve the base-entity view for `{kind, id}`, or `None` when no such
  /// client exists.
  pub async fn resolve(
    &self,
    kind: ClientKind,
    id: Uuid,
  ) -> Result<Option<Client>> {
    Ok(match kind {
      ClientKind::Person => {
        self.persons.get_by_id(id).await?.map(Client::Person)
      }
      ClientKind::Company => {
        self.companies.get_by_id(id).await?.map(Client::Company)
      }
    })
  }
}
