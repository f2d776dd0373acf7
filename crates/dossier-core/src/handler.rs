//! Variant handlers — the dispatch units binding one client kind to its
//! service and payload conversion.
//!
//! Each concrete handler statically knows its entity and payload types, so
//! routing a generic payload never needs a downcast: narrowing happens by
//! matching the closed [`ClientPayload`] enum.

use chrono::Local;
use uuid::Uuid;

use crate::{
  Error, Result,
  client::{ClientKind, Company, Person},
  payload::{ClientPayload, CompanyPayload, PersonPayload},
  service::{CompanyService, PersonService},
  store::{CompanyStore, PersonStore},
};

// ─── Person handler ──────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct PersonHandler<S> {
  service: PersonService<S>,
}

impl<S: PersonStore> PersonHandler<S> {
  pub fn new(service: PersonService<S>) -> Self { Self { service } }

  pub fn supported_kind(&self) -> ClientKind { ClientKind::Person }

  pub async fn get_all(&self) -> Result<Vec<PersonPayload>> {
    let persons = self.service.get_all().await?;
    Ok(persons.iter().map(PersonPayload::from).collect())
  }

  pub async fn get_by_id(&self, id: Uuid) -> Result<Option<PersonPayload>> {
    let person = self.service.get_by_id(id).await?;
    Ok(person.as_ref().map(PersonPayload::from))
  }

  pub async fn create(&self, payload: PersonPayload) -> Result<PersonPayload> {
    let entity = person_entity(payload)?;
    let created = self.service.create(entity).await?;
    Ok(PersonPayload::from(&created))
  }

  /// Overwrite only the shared mutable fields from the payload. A birthdate
  /// in the payload is discarded here, regardless of what earlier steps
  /// already masked.
  pub async fn update(
    &self,
    id: Uuid,
    payload: PersonPayload,
  ) -> Result<PersonPayload> {
    let mut existing = self.service.get_by_id(id).await?.ok_or(
      Error::ClientNotFound { kind: ClientKind::Person, id },
    )?;

    existing.name = payload.name;
    existing.email = payload.email;
    existing.phone = payload.phone;
    // payload.birthdate is intentionally never read.

    let updated = self.service.update(existing).await?;
    Ok(PersonPayload::from(&updated))
  }

  pub async fn delete(&self, id: Uuid) -> Result<()> {
    if let Some(person) = self.service.get_by_id(id).await? {
      self.service.delete(&person).await?;
    }
    Ok(())
  }

  /// Narrow a generic payload to this handler's variant.
  pub fn convert(&self, payload: ClientPayload) -> Result<PersonPayload> {
    match payload {
      ClientPayload::Person(p) => Ok(p),
      other => Err(Error::PayloadKindMismatch {
        expected: ClientKind::Person,
        got:      other.kind(),
      }),
    }
  }
}

fn person_entity(payload: PersonPayload) -> Result<Person> {
  let birthdate = payload.birthdate.ok_or(Error::MissingBirthdate)?;
  let today = Local::now().date_naive();

  Ok(Person {
    id: payload.id.unwrap_or_else(Uuid::new_v4),
    name: payload.name,
    email: payload.email,
    phone: payload.phone,
    birthdate,
    created_at: today,
    updated_at: today,
  })
}

// ─── Company handler ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct CompanyHandler<S> {
  service: CompanyService<S>,
}

impl<S: CompanyStore> CompanyHandler<S> {
  pub fn new(service: CompanyService<S>) -> Self { Self { service } }

  pub fn supported_kind(&self) -> ClientKind { ClientKind::Company }

  pub async fn get_all(&self) -> Result<Vec<CompanyPayload>> {
    let companies = self.service.get_all().await?;
    Ok(companies.iter().map(CompanyPayload::from).collect())
  }

  pub async fn get_by_id(&self, id: Uuid) -> Result<Option<CompanyPayload>> {
    let company = self.service.get_by_id(id).await?;
    Ok(company.as_ref().map(CompanyPayload::from))
  }

  /// May fail with a business-rule violation when the company identifier
  /// collides with an existing company.
  pub async fn create(
    &self,
    payload: CompanyPayload,
  ) -> Result<CompanyPayload> {
    let entity = company_entity(payload)?;
    let created = self.service.create(entity).await?;
    Ok(CompanyPayload::from(&created))
  }

  /// Overwrite only the shared mutable fields from the payload. A company
  /// identifier in the payload is discarded here, regardless of what
  /// earlier steps already masked.
  pub async fn update(
    &self,
    id: Uuid,
    payload: CompanyPayload,
  ) -> Result<CompanyPayload> {
    let mut existing = self.service.get_by_id(id).await?.ok_or(
      Error::ClientNotFound { kind: ClientKind::Company, id },
    )?;

    existing.name = payload.name;
    existing.email = payload.email;
    existing.phone = payload.phone;
    // payload.company_identifier is intentionally never read.

    let updated = self.service.update(existing).await?;
    Ok(CompanyPayload::from(&updated))
  }

  pub async fn delete(&self, id: Uuid) -> Result<()> {
    if let Some(company) = self.service.get_by_id(id).await? {
      self.service.delete(&company).await?;
    }
    Ok(())
  }

  /// Narrow a generic payload to this handler's variant.
  pub fn convert(&self, payload: ClientPayload) -> Result<CompanyPayload> {
    match payload {
      ClientPayload::Company(c) => Ok(c),
      other => Err(Error::PayloadKindMismatch {
        expected: ClientKind::Company,
        got:      other.kind(),
      }),
    }
  }
}

fn company_entity(payload: CompanyPayload) -> Result<Company> {
  let company_identifier = payload
    .company_identifier
    .ok_or(Error::MissingCompanyIdentifier)?;
  let today = Local::now().date_naive();

  Ok(Company {
    id: payload.id.unwrap_or_else(Uuid::new_v4),
    name: payload.name,
    email: payload.email,
    phone: payload.phone,
    company_identifier,
    created_at: today,
    updated_at: today,
  })
}

// ─── Uniform dispatch surface ────────────────────────────────────────────────

/// The closed dispatch surface over both variant handlers. The registry
/// stores these; the orchestrator talks only to this type and never to a
/// concrete handler.
#[derive(Clone, Debug)]
pub enum ClientHandler<PS, CS> {
  Person(PersonHandler<PS>),
  Company(CompanyHandler<CS>),
}

impl<PS: PersonStore, CS: CompanyStore> ClientHandler<PS, CS> {
  pub fn supported_kind(&self) -> ClientKind {
    match self {
      Self::Person(h) => h.supported_kind(),
      Self::Company(h) => h.supported_kind(),
    }
  }

  pub async fn get_all(&self) -> Result<Vec<ClientPayload>> {
    Ok(match self {
      Self::Person(h) => {
        h.get_all().await?.into_iter().map(ClientPayload::Person).collect()
      }
      Self::Company(h) => {
        h.get_all().await?.into_iter().map(ClientPayload::Company).collect()
      }
    })
  }

  pub async fn get_by_id(&self, id: Uuid) -> Result<Option<ClientPayload>> {
    Ok(match self {
      Self::Person(h) => h.get_by_id(id).await?.map(ClientPayload::Person),
      Self::Company(h) => h.get_by_id(id).await?.map(ClientPayload::Company),
    })
  }

  /// Narrow the generic payload to this handler's variant and create.
  /// Fails with a kind mismatch when the payload belongs to another
  /// variant.
  pub async fn create(&self, payload: ClientPayload) -> Result<ClientPayload> {
    match self {
      Self::Person(h) => {
        let created = h.create(h.convert(payload)?).await?;
        Ok(ClientPayload::Person(created))
      }
      Self::Company(h) => {
        let created = h.create(h.convert(payload)?).await?;
        Ok(ClientPayload::Company(created))
      }
    }
  }

  pub async fn update(
    &self,
    id: Uuid,
    payload: ClientPayload,
  ) -> Result<ClientPayload> {
    match self {
      Self::Person(h) => {
        let updated = h.update(id, h.convert(payload)?).await?;
        Ok(ClientPayload::Person(updated))
      }
      Self::Company(h) => {
        let updated = h.update(id, h.convert(payload)?).await?;
        Ok(ClientPayload::Company(updated))
      }
    }
  }

  pub async fn delete(&self, id: Uuid) -> Result<()> {
    match self {
      Self::Person(h) => h.delete(id).await,
      Self::Company(h) => h.delete(id).await,
    }
  }
}
