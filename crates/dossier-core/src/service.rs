//! Variant business services and the contract lifecycle service.
//!
//! Services own the per-variant invariants (identifier uniqueness, field
//! immutability timestamps) and the contract lifecycle rules. They talk to
//! the store traits and nothing else.

use chrono::{DateTime, Local, Utc};
use uuid::Uuid;

use crate::{
  Error, Result,
  client::{Client, Company, Person},
  contract::{Contract, NewContract},
  store::{CompanyStore, ContractStore, PersonStore},
};

// ─── Person service ──────────────────────────────────────────────────────────

/// Business logic for person clients.
#[derive(Clone, Debug)]
pub struct PersonService<S> {
  store: S,
}

impl<S: PersonStore> PersonService<S> {
  pub fn new(store: S) -> Self { Self { store } }

  pub async fn get_all(&self) -> Result<Vec<Person>> {
    self.store.find_all().await.map_err(Error::store)
  }

  /// Direct entity lookup, also used by the resolver and existence checks.
  pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Person>> {
    self.store.find_by_id(id).await.map_err(Error::store)
  }

  pub async fn create(&self, person: Person) -> Result<Person> {
    self.store.save(person.clone()).await.map_err(Error::store)?;
    Ok(person)
  }

  /// Persist an update to the shared mutable fields and refresh
  /// `updated_at`. The birthdate is never touched here.
  pub async fn update(&self, mut person: Person) -> Result<Person> {
    person.updated_at = Local::now().date_naive();
    self.store.save(person.clone()).await.map_err(Error::store)?;
    Ok(person)
  }

  /// Delete the person. The store closes and removes their contracts and
  /// removes the row in a single transaction.
  pub async fn delete(&self, person: &Person) -> Result<()> {
    self.store.delete(person.id).await.map_err(Error::store)
  }
}

// ─── Company service ─────────────────────────────────────────────────────────

/// Business logic for company clients.
#[derive(Clone, Debug)]
pub struct CompanyService<S> {
  store: S,
}

impl<S: CompanyStore> CompanyService<S> {
  pub fn new(store: S) -> Self { Self { store } }

  pub async fn get_all(&self) -> Result<Vec<Company>> {
    self.store.find_all().await.map_err(Error::store)
  }

  /// Direct entity lookup, also used by the resolver and existence checks.
  pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Company>> {
    self.store.find_by_id(id).await.map_err(Error::store)
  }

  /// Create a company, enforcing identifier uniqueness. On a collision the
  /// store's save is never invoked.
  pub async fn create(&self, company: Company) -> Result<Company> {
    let taken = self
      .store
      .exists_by_identifier(company.company_identifier.clone())
      .await
      .map_err(Error::store)?;
    if taken {
      return Err(Error::DuplicateCompanyIdentifier(
        company.company_identifier.as_str().to_owned(),
      ));
    }

    self.store.save(company.clone()).await.map_err(Error::store)?;
    Ok(company)
  }

  /// Persist an update to the shared mutable fields and refresh
  /// `updated_at`. The company identifier is never touched here.
  pub async fn update(&self, mut company: Company) -> Result<Company> {
    company.updated_at = Local::now().date_naive();
    self.store.save(company.clone()).await.map_err(Error::store)?;
    Ok(company)
  }

  /// Delete the company. The store closes and removes its contracts and
  /// removes the row in a single transaction.
  pub async fn delete(&self, company: &Company) -> Result<()> {
    self.store.delete(company.id).await.map_err(Error::store)
  }
}

// ─── Contract service ────────────────────────────────────────────────────────

/// Contract lifecycle: creation, cost updates, active-set queries, bulk
/// closure.
#[derive(Clone)]
pub struct ContractService<S> {
  store: S,
}

impl<S: ContractStore> ContractService<S> {
  pub fn new(store: S) -> Self { Self { store } }

  pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Contract>> {
    self.store.find_by_id(id).await.map_err(Error::store)
  }

  /// Create a contract against an existing client. A missing start date
  /// defaults to today; identity and timestamps are assigned here.
  pub async fn create_contract(&self, input: NewContract) -> Result<Contract> {
    if input.cost_amount < 0.0 {
      return Err(Error::NegativeCost(input.cost_amount));
    }

    let now = Utc::now();
    let contract = Contract {
      id:            Uuid::new_v4(),
      client_id:     input.client_id,
      start_date:    input
        .start_date
        .unwrap_or_else(|| Local::now().date_naive()),
      end_date:      input.end_date,
      cost_amount:   input.cost_amount,
      last_modified: now,
      created_at:    now,
    };

    self
      .store
      .save(contract.clone())
      .await
      .map_err(Error::store)?;
    Ok(contract)
  }

  /// Overwrite the cost and refresh `last_modified`. No lower bound is
  /// enforced at this layer; bounds belong to input validation upstream.
  pub async fn update_contract_cost(
    &self,
    mut contract: Contract,
    new_cost: f64,
  ) -> Result<Contract> {
    contract.cost_amount = new_cost;
    contract.last_modified = Utc::now();
    self
      .store
      .save(contract.clone())
      .await
      .map_err(Error::store)?;
    Ok(contract)
  }

  /// Active contracts for `client`. `updated_after = None` means no
  /// modification-time filter.
  pub async fn get_active_contracts(
    &self,
    client: &Client,
    updated_after: Option<DateTime<Utc>>,
  ) -> Result<Vec<Contract>> {
    let today = Local::now().date_naive();
    self
      .store
      .find_active_for_client(client.id(), today, updated_after)
      .await
      .map_err(Error::store)
  }

  /// Sum of cost over the client's active contracts. An empty active set
  /// sums to 0.0, never an error.
  pub async fn get_total_active_contracts_amount(
    &self,
    client: &Client,
  ) -> Result<f64> {
    let today = Local::now().date_naive();
    self
      .store
      .sum_active_cost(client.id(), today)
      .await
      .map_err(Error::store)
  }

  /// Close every active contract of `client` by setting its end date to
  /// today, then bulk-persist. Idempotent: a second call finds no active
  /// contracts and is a no-op.
  pub async fn close_contracts_on_client_deletion(
    &self,
    client: &Client,
  ) -> Result<()> {
    let today = Local::now().date_naive();
    let mut contracts = self
      .store
      .find_active_for_client(client.id(), today, None)
      .await
      .map_err(Error::store)?;

    let now = Utc::now();
    for contract in &mut contracts {
      contract.end_date = Some(today);
      contract.last_modified = now;
    }

    self.store.save_all(contracts).await.map_err(Error::store)
  }
}
