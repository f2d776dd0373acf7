//! External-representation payloads and the partial-update patch.
//!
//! [`ClientPayload`] is internally tagged on `type`, so an inbound payload
//! is self-describing: the variant is read from the payload itself, never
//! from a separate parameter. Variant-immutable fields (`birthdate`,
//! `company_identifier`) are optional here so the orchestrator can mask
//! them out of update payloads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::{Client, ClientKind, Company, CompanyIdentifier, Person};

// ─── Variant payloads ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonPayload {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:        Option<Uuid>,
  pub name:      String,
  pub email:     String,
  #[serde(default)]
  pub phone:     Option<String>,
  /// Required at creation; never honoured by updates.
  #[serde(default)]
  pub birthdate: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyPayload {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:                 Option<Uuid>,
  pub name:               String,
  pub email:              String,
  #[serde(default)]
  pub phone:              Option<String>,
  /// Required at creation; never honoured by updates.
  #[serde(default)]
  pub company_identifier: Option<CompanyIdentifier>,
}

// ─── Generic payload ─────────────────────────────────────────────────────────

/// The generic, self-describing client payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum ClientPayload {
  Person(PersonPayload),
  Company(CompanyPayload),
}

impl ClientPayload {
  pub fn kind(&self) -> ClientKind {
    match self {
      Self::Person(_) => ClientKind::Person,
      Self::Company(_) => ClientKind::Company,
    }
  }

  pub fn name(&self) -> &str {
    match self {
      Self::Person(p) => &p.name,
      Self::Company(c) => &c.name,
    }
  }

  pub fn email(&self) -> &str {
    match self {
      Self::Person(p) => &p.email,
      Self::Company(c) => &c.email,
    }
  }

  pub fn phone(&self) -> Option<&str> {
    match self {
      Self::Person(p) => p.phone.as_deref(),
      Self::Company(c) => c.phone.as_deref(),
    }
  }

  /// Merge a partial update into this payload: a patch field wins only when
  /// present, otherwise the existing value is kept. Variant-specific fields
  /// are carried over untouched; masking them is a separate step.
  pub fn merged_with(&self, patch: &ClientPatch) -> ClientPayload {
    match self {
      Self::Person(existing) => Self::Person(PersonPayload {
        id:        existing.id,
        name:      patch.name.clone().unwrap_or_else(|| existing.name.clone()),
        email:     patch
          .email
          .clone()
          .unwrap_or_else(|| existing.email.clone()),
        phone:     patch.phone.clone().or_else(|| existing.phone.clone()),
        birthdate: existing.birthdate,
      }),
      Self::Company(existing) => Self::Company(CompanyPayload {
        id:                 existing.id,
        name:               patch
          .name
          .clone()
          .unwrap_or_else(|| existing.name.clone()),
        email:              patch
          .email
          .clone()
          .unwrap_or_else(|| existing.email.clone()),
        phone:              patch.phone.clone().or_else(|| existing.phone.clone()),
        company_identifier: existing.company_identifier.clone(),
      }),
    }
  }

  /// Clear the variant-immutable fields (birthdate, company identifier).
  ///
  /// The handlers ignore these fields on update as well; this is the
  /// second, independent enforcement point and both are kept on purpose.
  pub fn clear_immutable_fields(&mut self) {
    match self {
      Self::Person(p) => p.birthdate = None,
      Self::Company(c) => c.company_identifier = None,
    }
  }
}

impl From<&Person> for PersonPayload {
  fn from(person: &Person) -> Self {
    Self {
      id:        Some(person.id),
      name:      person.name.clone(),
      email:     person.email.clone(),
      phone:     person.phone.clone(),
      birthdate: Some(person.birthdate),
    }
  }
}

impl From<&Company> for CompanyPayload {
  fn from(company: &Company) -> Self {
    Self {
      id:                 Some(company.id),
      name:               company.name.clone(),
      email:              company.email.clone(),
      phone:              company.phone.clone(),
      company_identifier: Some(company.company_identifier.clone()),
    }
  }
}

impl From<&Client> for ClientPayload {
  fn from(client: &Client) -> Self {
    match client {
      Client::Person(p) => Self::Person(p.into()),
      Client::Company(c) => Self::Company(c.into()),
    }
  }
}

// ─── Patch ───────────────────────────────────────────────────────────────────

/// Partial update for the shared mutable fields. An absent field means
/// "keep the stored value".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientPatch {
  #[serde(default)]
  pub name:  Option<String>,
  #[serde(default)]
  pub email: Option<String>,
  #[serde(default)]
  pub phone: Option<String>,
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn person_payload() -> ClientPayload {
    ClientPayload::Person(PersonPayload {
      id:        None,
      name:      "A".into(),
      email:     "a@x".into(),
      phone:     Some("1".into()),
      birthdate: NaiveDate::from_ymd_opt(1980, 1, 1),
    })
  }

  #[test]
  fn payload_is_self_describing() {
    let json = r#"{
      "type": "PERSON",
      "name": "John",
      "email": "john@x.com",
      "birthdate": "1980-01-01"
    }"#;
    let payload: ClientPayload = serde_json::from_str(json).unwrap();
    assert_eq!(payload.kind(), ClientKind::Person);
  }

  #[test]
  fn company_payload_validates_identifier_on_deserialize() {
    let json = r#"{
      "type": "COMPANY",
      "name": "Acme",
      "email": "hq@acme.com",
      "company_identifier": "not-an-identifier"
    }"#;
    assert!(serde_json::from_str::<ClientPayload>(json).is_err());
  }

  #[test]
  fn merge_present_fields_win_absent_fields_keep() {
    let patch = ClientPatch {
      name:  None,
      email: Some("B".into()),
      phone: None,
    };

    let ClientPayload::Person(merged) = person_payload().merged_with(&patch)
    else {
      panic!("merge changed the variant");
    };
    assert_eq!(merged.name, "A");
    assert_eq!(merged.email, "B");
    assert_eq!(merged.phone.as_deref(), Some("1"));
  }

  #[test]
  fn merge_carries_immutable_fields_untouched() {
    let merged = person_payload().merged_with(&ClientPatch::default());
    let ClientPayload::Person(merged) = merged else { unreachable!() };
    assert_eq!(merged.birthdate, NaiveDate::from_ymd_opt(1980, 1, 1));
  }

  #[test]
  fn masking_clears_birthdate() {
    let mut payload = person_payload();
    payload.clear_immutable_fields();
    let ClientPayload::Person(p) = payload else { unreachable!() };
    assert!(p.birthdate.is_none());
  }

  #[test]
  fn masking_clears_company_identifier() {
    let mut payload = ClientPayload::Company(CompanyPayload {
      id:                 None,
      name:               "Acme".into(),
      email:              "hq@acme.com".into(),
      phone:              None,
      company_identifier: Some(CompanyIdentifier::new("aaa-123").unwrap()),
    });
    payload.clear_immutable_fields();
    let ClientPayload::Company(c) = payload else { unreachable!() };
    assert!(c.company_identifier.is_none());
  }
}
