//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Calendar dates are stored as `YYYY-MM-DD`, timestamps as RFC 3339 strings,
//! and UUIDs as hyphenated lowercase strings. Both date encodings compare
//! lexicographically, which the active-contract predicates rely on.

use chrono::{DateTime, NaiveDate, Utc};
use dossier_core::{
  client::{ClientKind, Company, CompanyIdentifier, Person},
  contract::Contract,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── ClientKind ──────────────────────────────────────────────────────────────

pub fn encode_kind(k: ClientKind) -> &'static str {
  match k {
    ClientKind::Person => "person",
    ClientKind::Company => "company",
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `clients` row.
pub struct RawClient {
  pub client_id:          String,
  pub name:               String,
  pub email:              String,
  pub phone:              Option<String>,
  pub birthdate:          Option<String>,
  pub company_identifier: Option<String>,
  pub created_at:         String,
  pub updated_at:         String,
}

impl RawClient {
  pub fn into_person(self) -> Result<Person> {
    let birthdate = self.birthdate.ok_or_else(|| Error::MissingColumn {
      id:     self.client_id.clone(),
      column: "birthdate",
    })?;

    Ok(Person {
      id:         decode_uuid(&self.client_id)?,
      name:       self.name,
      email:      self.email,
      phone:      self.phone,
      birthdate:  decode_date(&birthdate)?,
      created_at: decode_date(&self.created_at)?,
      updated_at: decode_date(&self.updated_at)?,
    })
  }

  pub fn into_company(self) -> Result<Company> {
    let identifier =
      self.company_identifier.ok_or_else(|| Error::MissingColumn {
        id:     self.client_id.clone(),
        column: "company_identifier",
      })?;

    Ok(Company {
      id:                 decode_uuid(&self.client_id)?,
      name:               self.name,
      email:              self.email,
      phone:              self.phone,
      company_identifier: CompanyIdentifier::new(identifier)?,
      created_at:         decode_date(&self.created_at)?,
      updated_at:         decode_date(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `contracts` row.
pub struct RawContract {
  pub contract_id:   String,
  pub client_id:     String,
  pub start_date:    String,
  pub end_date:      Option<String>,
  pub cost_amount:   f64,
  pub last_modified: String,
  pub created_at:    String,
}

impl RawContract {
  pub fn into_contract(self) -> Result<Contract> {
    Ok(Contract {
      id:            decode_uuid(&self.contract_id)?,
      client_id:     decode_uuid(&self.client_id)?,
      start_date:    decode_date(&self.start_date)?,
      end_date:      self.end_date.as_deref().map(decode_date).transpose()?,
      cost_amount:   self.cost_amount,
      last_modified: decode_dt(&self.last_modified)?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}
