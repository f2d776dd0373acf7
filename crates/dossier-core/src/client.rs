//! Client entities — the two concrete variants and their shared base view.
//!
//! There is no open inheritance here: `Client` is a closed tagged union, so
//! a record's kind tag and its concrete variant cannot disagree.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Kind tag ────────────────────────────────────────────────────────────────

/// The kind of client a record represents.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
  Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClientKind {
  Person,
  Company,
}

impl std::fmt::Display for ClientKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Person => f.write_str("PERSON"),
      Self::Company => f.write_str("COMPANY"),
    }
  }
}

// ─── Company identifier ──────────────────────────────────────────────────────

/// A company's natural key: three ASCII letters, a hyphen, three digits
/// (e.g. `abc-123`). Unique across all companies and immutable after
/// creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompanyIdentifier(String);

impl CompanyIdentifier {
  pub fn new(raw: impl Into<String>) -> Result<Self> {
    let raw = raw.into();
    let bytes = raw.as_bytes();
    let well_formed = bytes.len() == 7
      && bytes[..3].iter().all(u8::is_ascii_alphabetic)
      && bytes[3] == b'-'
      && bytes[4..].iter().all(u8::is_ascii_digit);

    if !well_formed {
      return Err(Error::InvalidCompanyIdentifier(raw));
    }
    Ok(Self(raw))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl TryFrom<String> for CompanyIdentifier {
  type Error = Error;

  fn try_from(raw: String) -> Result<Self> { Self::new(raw) }
}

impl From<CompanyIdentifier> for String {
  fn from(id: CompanyIdentifier) -> Self { id.0 }
}

impl std::fmt::Display for CompanyIdentifier {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Variants ────────────────────────────────────────────────────────────────

/// A natural person. `birthdate` is set at creation and never altered by
/// update operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
  pub id:         Uuid,
  pub name:       String,
  pub email:      String,
  pub phone:      Option<String>,
  pub birthdate:  NaiveDate,
  /// Set at creation; never changes.
  pub created_at: NaiveDate,
  /// Refreshed on every mutation.
  pub updated_at: NaiveDate,
}

/// A company. `company_identifier` is set at creation and never altered by
/// update operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
  pub id:                 Uuid,
  pub name:               String,
  pub email:              String,
  pub phone:              Option<String>,
  pub company_identifier: CompanyIdentifier,
  pub created_at:         NaiveDate,
  pub updated_at:         NaiveDate,
}

// ─── Base view ───────────────────────────────────────────────────────────────

/// The closed set of client variants, used wherever cross-variant
/// coordination only needs the shared base view (e.g. contract closure on
/// deletion).
#[derive(Debug, Clone)]
pub enum Client {
  Person(Person),
  Company(Company),
}

impl Client {
  pub fn id(&self) -> Uuid {
    match self {
      Self::Person(p) => p.id,
      Self::Company(c) => c.id,
    }
  }

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
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn identifier_accepts_letters_hyphen_digits() {
    assert!(CompanyIdentifier::new("aaa-123").is_ok());
    assert!(CompanyIdentifier::new("XYZ-000").is_ok());
  }

  #[test]
  fn identifier_rejects_malformed_input() {
    for raw in ["", "aaa123", "aaaa-123", "aa-1234", "aaa-12x", "12a-abc"] {
      let err = CompanyIdentifier::new(raw).unwrap_err();
      assert!(matches!(err, Error::InvalidCompanyIdentifier(_)), "{raw:?}");
    }
  }

  #[test]
  fn identifier_keeps_original_case() {
    let id = CompanyIdentifier::new("AbC-001").unwrap();
    assert_eq!(id.as_str(), "AbC-001");
  }
}
