//! [`SqliteStore`] — the SQLite implementation of the Dossier store traits.

use std::path::Path;

use chrono::{DateTime, Local, NaiveDate, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use dossier_core::{
  client::{ClientKind, Company, CompanyIdentifier, Person},
  contract::Contract,
  store::{CompanyStore, ContractStore, PersonStore},
};

use crate::{
  encode::{
    RawClient, RawContract, encode_date, encode_dt, encode_kind, encode_uuid,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Dossier store backed by a single SQLite file. Serves as all three of
/// the person, company, and contract stores.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch one client row, constrained to `kind` so an id of the other
  /// variant resolves to nothing.
  async fn client_row(
    &self,
    kind: ClientKind,
    id: Uuid,
  ) -> Result<Option<RawClient>> {
    let id_str   = encode_uuid(id);
    let kind_str = encode_kind(kind).to_owned();

    let raw: Option<RawClient> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT client_id, name, email, phone, birthdate,
                      company_identifier, created_at, updated_at
               FROM clients WHERE client_id = ?1 AND kind = ?2",
              rusqlite::params![id_str, kind_str],
              |row| {
                Ok(RawClient {
                  client_id:          row.get(0)?,
                  name:               row.get(1)?,
                  email:              row.get(2)?,
                  phone:              row.get(3)?,
                  birthdate:          row.get(4)?,
                  company_identifier: row.get(5)?,
                  created_at:         row.get(6)?,
                  updated_at:         row.get(7)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw)
  }

  async fn client_rows(&self, kind: ClientKind) -> Result<Vec<RawClient>> {
    let kind_str = encode_kind(kind).to_owned();

    let raws: Vec<RawClient> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT client_id, name, email, phone, birthdate,
                  company_identifier, created_at, updated_at
           FROM clients WHERE kind = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![kind_str], |row| {
            Ok(RawClient {
              client_id:          row.get(0)?,
              name:               row.get(1)?,
              email:              row.get(2)?,
              phone:              row.get(3)?,
              birthdate:          row.get(4)?,
              company_identifier: row.get(5)?,
              created_at:         row.get(6)?,
              updated_at:         row.get(7)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws)
  }

  /// Remove one client and its contracts as a single transaction.
  ///
  /// Active contracts are closed (end date = today) before any row is
  /// removed; then the contract rows and the client row go. Either the
  /// whole unit commits or none of it does.
  async fn remove_client(&self, kind: ClientKind, id: Uuid) -> Result<()> {
    let id_str    = encode_uuid(id);
    let kind_str  = encode_kind(kind).to_owned();
    let today_str = encode_date(Local::now().date_naive());
    let now_str   = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "UPDATE contracts SET end_date = ?2, last_modified = ?3
           WHERE client_id = ?1 AND (end_date IS NULL OR end_date > ?2)",
          rusqlite::params![id_str, today_str, now_str],
        )?;
        tx.execute(
          "DELETE FROM contracts WHERE client_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.execute(
          "DELETE FROM clients WHERE client_id = ?1 AND kind = ?2",
          rusqlite::params![id_str, kind_str],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(())
  }
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqliteStore {
  type Error = Error;

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Person>> {
    self
      .client_row(ClientKind::Person, id)
      .await?
      .map(RawClient::into_person)
      .transpose()
  }

  async fn find_all(&self) -> Result<Vec<Person>> {
    self
      .client_rows(ClientKind::Person)
      .await?
      .into_iter()
      .map(RawClient::into_person)
      .collect()
  }

  async fn save(&self, person: Person) -> Result<()> {
    let id_str        = encode_uuid(person.id);
    let birthdate_str = encode_date(person.birthdate);
    let created_str   = encode_date(person.created_at);
    let updated_str   = encode_date(person.updated_at);
    let Person { name, email, phone, .. } = person;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO clients (
             client_id, kind, name, email, phone,
             birthdate, company_identifier, created_at, updated_at
           ) VALUES (?1, 'person', ?2, ?3, ?4, ?5, NULL, ?6, ?7)",
          rusqlite::params![
            id_str,
            name,
            email,
            phone,
            birthdate_str,
            created_str,
            updated_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete(&self, id: Uuid) -> Result<()> {
    self.remove_client(ClientKind::Person, id).await
  }
}

// ─── CompanyStore impl ───────────────────────────────────────────────────────

impl CompanyStore for SqliteStore {
  type Error = Error;

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>> {
    self
      .client_row(ClientKind::Company, id)
      .await?
      .map(RawClient::into_company)
      .transpose()
  }

  async fn find_all(&self) -> Result<Vec<Company>> {
    self
      .client_rows(ClientKind::Company)
      .await?
      .into_iter()
      .map(RawClient::into_company)
      .collect()
  }

  async fn exists_by_identifier(
    &self,
    identifier: CompanyIdentifier,
  ) -> Result<bool> {
    let ident = identifier.as_str().to_owned();

    let exists: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM clients
               WHERE company_identifier = ?1 AND kind = 'company'",
              rusqlite::params![ident],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;

    Ok(exists)
  }

  async fn save(&self, company: Company) -> Result<()> {
    let id_str      = encode_uuid(company.id);
    let ident_str   = company.company_identifier.as_str().to_owned();
    let created_str = encode_date(company.created_at);
    let updated_str = encode_date(company.updated_at);
    let Company { name, email, phone, .. } = company;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO clients (
             client_id, kind, name, email, phone,
             birthdate, company_identifier, created_at, updated_at
           ) VALUES (?1, 'company', ?2, ?3, ?4, NULL, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            name,
            email,
            phone,
            ident_str,
            created_str,
            updated_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete(&self, id: Uuid) -> Result<()> {
    self.remove_client(ClientKind::Company, id).await
  }
}

// ─── ContractStore impl ──────────────────────────────────────────────────────

impl ContractStore for SqliteStore {
  type Error = Error;

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Contract>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawContract> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT contract_id, client_id, start_date, end_date,
                      cost_amount, last_modified, created_at
               FROM contracts WHERE contract_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawContract {
                  contract_id:   row.get(0)?,
                  client_id:     row.get(1)?,
                  start_date:    row.get(2)?,
                  end_date:      row.get(3)?,
                  cost_amount:   row.get(4)?,
                  last_modified: row.get(5)?,
                  created_at:    row.get(6)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawContract::into_contract).transpose()
  }

  async fn find_active_for_client(
    &self,
    client_id: Uuid,
    today: NaiveDate,
    updated_after: Option<DateTime<Utc>>,
  ) -> Result<Vec<Contract>> {
    let id_str     = encode_uuid(client_id);
    let today_str  = encode_date(today);
    let cutoff_str = updated_after.map(encode_dt);

    let raws: Vec<RawContract> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT contract_id, client_id, start_date, end_date,
                  cost_amount, last_modified, created_at
           FROM contracts
           WHERE client_id = ?1
             AND (end_date IS NULL OR end_date > ?2)
             AND (?3 IS NULL OR last_modified > ?3)",
        )?;
        let rows = stmt
          .query_map(
            rusqlite::params![id_str, today_str, cutoff_str],
            |row| {
              Ok(RawContract {
                contract_id:   row.get(0)?,
                client_id:     row.get(1)?,
                start_date:    row.get(2)?,
                end_date:      row.get(3)?,
                cost_amount:   row.get(4)?,
                last_modified: row.get(5)?,
                created_at:    row.get(6)?,
              })
            },
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawContract::into_contract).collect()
  }

  async fn sum_active_cost(
    &self,
    client_id: Uuid,
    today: NaiveDate,
  ) -> Result<f64> {
    let id_str    = encode_uuid(client_id);
    let today_str = encode_date(today);

    let total: f64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COALESCE(SUM(cost_amount), 0) FROM contracts
           WHERE client_id = ?1
             AND (end_date IS NULL OR end_date > ?2)",
          rusqlite::params![id_str, today_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(total)
  }

  async fn save(&self, contract: Contract) -> Result<()> {
    let contract_id_str = encode_uuid(contract.id);
    let client_id_str   = encode_uuid(contract.client_id);
    let start_str       = encode_date(contract.start_date);
    let end_str         = contract.end_date.map(encode_date);
    let cost            = contract.cost_amount;
    let modified_str    = encode_dt(contract.last_modified);
    let created_str     = encode_dt(contract.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO contracts (
             contract_id, client_id, start_date, end_date,
             cost_amount, last_modified, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            contract_id_str,
            client_id_str,
            start_str,
            end_str,
            cost,
            modified_str,
            created_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn save_all(&self, contracts: Vec<Contract>) -> Result<()> {
    let rows: Vec<_> = contracts
      .iter()
      .map(|c| {
        (
          encode_uuid(c.id),
          encode_uuid(c.client_id),
          encode_date(c.start_date),
          c.end_date.map(encode_date),
          c.cost_amount,
          encode_dt(c.last_modified),
          encode_dt(c.created_at),
        )
      })
      .collect();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO contracts (
               contract_id, client_id, start_date, end_date,
               cost_amount, last_modified, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          )?;
          for row in &rows {
            stmt.execute(rusqlite::params![
              row.0, row.1, row.2, row.3, row.4, row.5, row.6,
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
