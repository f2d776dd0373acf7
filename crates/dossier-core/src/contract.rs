//! Contract — the agreement attached to exactly one client.
//!
//! Contracts are mutated only through cost updates and closure, and removed
//! only as a cascade of client removal.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A contract held by a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
  pub id:            Uuid,
  /// The owning client; a contract belongs to exactly one.
  pub client_id:     Uuid,
  pub start_date:    NaiveDate,
  /// `None` or a future date means the contract is active. Closure is the
  /// only operation that sets this, and it always sets it to today.
  pub end_date:      Option<NaiveDate>,
  pub cost_amount:   f64,
  /// Refreshed on every cost change and on closure.
  pub last_modified: DateTime<Utc>,
  /// Assigned at creation; never changes.
  pub created_at:    DateTime<Utc>,
}

impl Contract {
  /// Active ⇔ no end date, or an end date strictly after `today`.
  pub fn is_active(&self, today: NaiveDate) -> bool {
    self.end_date.is_none_or(|end| end > today)
  }
}

/// Input to [`crate::service::ContractService::create_contract`]. Identity
/// and timestamps are always assigned by the service, never accepted from
/// callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContract {
  pub client_id:   Uuid,
  /// Defaults to today when omitted.
  #[serde(default)]
  pub start_date:  Option<NaiveDate>,
  #[serde(default)]
  pub end_date:    Option<NaiveDate>,
  pub cost_amount: f64,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn contract(end_date: Option<NaiveDate>) -> Contract {
    Contract {
      id: Uuid::new_v4(),
      client_id: Uuid::new_v4(),
      start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
      end_date,
      cost_amount: 100.0,
      last_modified: Utc::now(),
      created_at: Utc::now(),
    }
  }

  #[test]
  fn active_predicate_boundaries() {
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

    assert!(contract(None).is_active(today));
    assert!(contract(today.succ_opt()).is_active(today));
    assert!(!contract(Some(today)).is_active(today));
    assert!(!contract(today.pred_opt()).is_active(today));
  }
}
