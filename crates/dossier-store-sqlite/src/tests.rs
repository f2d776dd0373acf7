//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, Local, NaiveDate, Utc};
use dossier_core::{
  client::{Client, ClientKind, Company, CompanyIdentifier, Person},
  contract::{Contract, NewContract},
  handler::{ClientHandler, CompanyHandler, PersonHandler},
  orchestrator::ClientOrchestrator,
  payload::{ClientPatch, ClientPayload, PersonPayload},
  registry::HandlerRegistry,
  resolver::ClientResolver,
  service::{CompanyService, ContractService, PersonService},
  store::{CompanyStore, ContractStore, PersonStore},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn person(name: &str) -> Person {
  let today = Local::now().date_naive();
  Person {
    id:         Uuid::new_v4(),
    name:       name.into(),
    email:      format!("{}@example.com", name.to_lowercase()),
    phone:      Some("555-0100".into()),
    birthdate:  NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
    created_at: today,
    updated_at: today,
  }
}

fn company(identifier: &str) -> Company {
  let today = Local::now().date_naive();
  Company {
    id:                 Uuid::new_v4(),
    name:               "Acme".into(),
    email:              "hq@acme.com".into(),
    phone:              None,
    company_identifier: CompanyIdentifier::new(identifier).unwrap(),
    created_at:         today,
    updated_at:         today,
  }
}

fn contract(
  client_id: Uuid,
  cost: f64,
  end_date: Option<NaiveDate>,
) -> Contract {
  let now = Utc::now();
  Contract {
    id: Uuid::new_v4(),
    client_id,
    start_date: Local::now().date_naive(),
    end_date,
    cost_amount: cost,
    last_modified: now,
    created_at: now,
  }
}

// ─── Clients ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_and_find_person() {
  let s = store().await;
  let alice = person("Alice");

  PersonStore::save(&s, alice.clone()).await.unwrap();

  let fetched = PersonStore::find_by_id(&s, alice.id)
    .await
    .unwrap()
    .expect("person exists");
  assert_eq!(fetched.name, "Alice");
  assert_eq!(fetched.birthdate, alice.birthdate);
  assert_eq!(fetched.phone.as_deref(), Some("555-0100"));
}

#[tokio::test]
async fn find_missing_person_returns_none() {
  let s = store().await;
  let result = PersonStore::find_by_id(&s, Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn save_and_find_company() {
  let s = store().await;
  let acme = company("aaa-123");

  CompanyStore::save(&s, acme.clone()).await.unwrap();

  let fetched = CompanyStore::find_by_id(&s, acme.id)
    .await
    .unwrap()
    .expect("company exists");
  assert_eq!(fetched.company_identifier.as_str(), "aaa-123");
}

#[tokio::test]
async fn find_all_filters_by_kind() {
  let s = store().await;
  PersonStore::save(&s, person("Alice")).await.unwrap();
  PersonStore::save(&s, person("Bob")).await.unwrap();
  CompanyStore::save(&s, company("aaa-123")).await.unwrap();

  let persons = PersonStore::find_all(&s).await.unwrap();
  assert_eq!(persons.len(), 2);

  let companies = CompanyStore::find_all(&s).await.unwrap();
  assert_eq!(companies.len(), 1);
}

#[tokio::test]
async fn person_id_does_not_resolve_as_company() {
  let s = store().await;
  let alice = person("Alice");
  PersonStore::save(&s, alice.clone()).await.unwrap();

  let result = CompanyStore::find_by_id(&s, alice.id).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn exists_by_identifier_sees_saved_companies() {
  let s = store().await;
  CompanyStore::save(&s, company("aaa-123")).await.unwrap();

  let taken = s
    .exists_by_identifier(CompanyIdentifier::new("aaa-123").unwrap())
    .await
    .unwrap();
  assert!(taken);

  let free = s
    .exists_by_identifier(CompanyIdentifier::new("zzz-999").unwrap())
    .await
    .unwrap();
  assert!(!free);
}

// ─── Contracts ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_and_find_contract() {
  let s = store().await;
  let alice = person("Alice");
  PersonStore::save(&s, alice.clone()).await.unwrap();

  let c = contract(alice.id, 100.0, None);
  ContractStore::save(&s, c.clone()).await.unwrap();

  let fetched = ContractStore::find_by_id(&s, c.id)
    .await
    .unwrap()
    .expect("contract exists");
  assert_eq!(fetched.client_id, alice.id);
  assert_eq!(fetched.cost_amount, 100.0);
  assert!(fetched.end_date.is_none());
}

#[tokio::test]
async fn active_query_honours_end_date_boundaries() {
  let s = store().await;
  let alice = person("Alice");
  PersonStore::save(&s, alice.clone()).await.unwrap();

  let today = Local::now().date_naive();
  // Open-ended and future-dated contracts are active; contracts ending
  // today or earlier are not.
  ContractStore::save(&s, contract(alice.id, 1.0, None))
    .await
    .unwrap();
  ContractStore::save(&s, contract(alice.id, 2.0, today.succ_opt()))
    .await
    .unwrap();
  ContractStore::save(&s, contract(alice.id, 4.0, Some(today)))
    .await
    .unwrap();
  ContractStore::save(&s, contract(alice.id, 8.0, today.pred_opt()))
    .await
    .unwrap();

  let active = s
    .find_active_for_client(alice.id, today, None)
    .await
    .unwrap();
  assert_eq!(active.len(), 2);
  let total: f64 = active.iter().map(|c| c.cost_amount).sum();
  assert_eq!(total, 3.0);
}

#[tokio::test]
async fn cutoff_filters_by_last_modified() {
  let s = store().await;
  let alice = person("Alice");
  PersonStore::save(&s, alice.clone()).await.unwrap();

  let c = contract(alice.id, 100.0, None);
  ContractStore::save(&s, c.clone()).await.unwrap();
  let today = Local::now().date_naive();

  // No cutoff: everything active.
  let all = s
    .find_active_for_client(alice.id, today, None)
    .await
    .unwrap();
  assert_eq!(all.len(), 1);

  // Cutoff before the write: still included.
  let before = c.last_modified - Duration::seconds(5);
  let recent = s
    .find_active_for_client(alice.id, today, Some(before))
    .await
    .unwrap();
  assert_eq!(recent.len(), 1);

  // Cutoff after the write: excluded.
  let after = c.last_modified + Duration::seconds(5);
  let stale = s
    .find_active_for_client(alice.id, today, Some(after))
    .await
    .unwrap();
  assert!(stale.is_empty());
}

#[tokio::test]
async fn sum_is_zero_without_contracts() {
  let s = store().await;
  let total = s
    .sum_active_cost(Uuid::new_v4(), Local::now().date_naive())
    .await
    .unwrap();
  assert_eq!(total, 0.0);
}

#[tokio::test]
async fn sum_covers_only_active_contracts() {
  let s = store().await;
  let alice = person("Alice");
  PersonStore::save(&s, alice.clone()).await.unwrap();

  let today = Local::now().date_naive();
  ContractStore::save(&s, contract(alice.id, 100.0, None))
    .await
    .unwrap();
  ContractStore::save(&s, contract(alice.id, 250.0, today.succ_opt()))
    .await
    .unwrap();
  ContractStore::save(&s, contract(alice.id, 999.0, Some(today)))
    .await
    .unwrap();

  let total = s.sum_active_cost(alice.id, today).await.unwrap();
  assert_eq!(total, 350.0);
}

#[tokio::test]
async fn sum_is_invariant_to_insertion_order() {
  let alice = person("Alice");
  let today = Local::now().date_naive();
  let set = [
    contract(alice.id, 100.0, None),
    contract(alice.id, 250.0, today.succ_opt()),
    contract(alice.id, 0.5, None),
  ];

  // Same contract set, opposite insertion orders, two stores.
  let forward = store().await;
  PersonStore::save(&forward, alice.clone()).await.unwrap();
  for c in &set {
    ContractStore::save(&forward, c.clone()).await.unwrap();
  }

  let reversed = store().await;
  PersonStore::save(&reversed, alice.clone()).await.unwrap();
  for c in set.iter().rev() {
    ContractStore::save(&reversed, c.clone()).await.unwrap();
  }

  let a = forward.sum_active_cost(alice.id, today).await.unwrap();
  let b = reversed.sum_active_cost(alice.id, today).await.unwrap();
  assert_eq!(a, 350.5);
  assert_eq!(a, b);

  let client = Client::Person(alice);
  let service_a = ContractService::new(forward)
    .get_total_active_contracts_amount(&client)
    .await
    .unwrap();
  let service_b = ContractService::new(reversed)
    .get_total_active_contracts_amount(&client)
    .await
    .unwrap();
  assert_eq!(service_a, service_b);
}

#[tokio::test]
async fn save_all_persists_the_whole_batch() {
  let s = store().await;
  let alice = person("Alice");
  PersonStore::save(&s, alice.clone()).await.unwrap();

  let batch =
    vec![contract(alice.id, 1.0, None), contract(alice.id, 2.0, None)];
  s.save_all(batch.clone()).await.unwrap();

  for c in &batch {
    assert!(ContractStore::find_by_id(&s, c.id).await.unwrap().is_some());
  }
}

// ─── Deletion cascade ────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_client_and_contracts_together() {
  let s = store().await;
  let alice = person("Alice");
  PersonStore::save(&s, alice.clone()).await.unwrap();

  let c1 = contract(alice.id, 100.0, None);
  let c2 = contract(alice.id, 250.0, None);
  ContractStore::save(&s, c1.clone()).await.unwrap();
  ContractStore::save(&s, c2.clone()).await.unwrap();

  PersonStore::delete(&s, alice.id).await.unwrap();

  assert!(PersonStore::find_by_id(&s, alice.id).await.unwrap().is_none());
  assert!(ContractStore::find_by_id(&s, c1.id).await.unwrap().is_none());
  assert!(ContractStore::find_by_id(&s, c2.id).await.unwrap().is_none());

  let today = Local::now().date_naive();
  let active = s
    .find_active_for_client(alice.id, today, None)
    .await
    .unwrap();
  assert!(active.is_empty());
}

#[tokio::test]
async fn delete_leaves_other_clients_contracts_alone() {
  let s = store().await;
  let alice = person("Alice");
  let bob = person("Bob");
  PersonStore::save(&s, alice.clone()).await.unwrap();
  PersonStore::save(&s, bob.clone()).await.unwrap();

  let bobs = contract(bob.id, 500.0, None);
  ContractStore::save(&s, contract(alice.id, 100.0, None))
    .await
    .unwrap();
  ContractStore::save(&s, bobs.clone()).await.unwrap();

  PersonStore::delete(&s, alice.id).await.unwrap();

  let fetched = ContractStore::find_by_id(&s, bobs.id)
    .await
    .unwrap()
    .expect("unrelated contract survives");
  assert!(fetched.end_date.is_none());
}

// ─── Service-level closure ───────────────────────────────────────────────────

#[tokio::test]
async fn closure_is_idempotent_over_sqlite() {
  let s = store().await;
  let alice = person("Alice");
  PersonStore::save(&s, alice.clone()).await.unwrap();

  let contracts = ContractService::new(s.clone());
  let mut created = Vec::new();
  for cost in [100.0, 250.0] {
    let c = contracts
      .create_contract(NewContract {
        client_id:   alice.id,
        start_date:  None,
        end_date:    None,
        cost_amount: cost,
      })
      .await
      .unwrap();
    created.push(c);
  }

  let client = Client::Person(alice);
  contracts
    .close_contracts_on_client_deletion(&client)
    .await
    .unwrap();

  // Closure wrote end_date = today through to the rows.
  let today = Local::now().date_naive();
  for c in &created {
    let closed = ContractStore::find_by_id(&s, c.id)
      .await
      .unwrap()
      .expect("contract row survives closure");
    assert_eq!(closed.end_date, Some(today));
  }

  contracts
    .close_contracts_on_client_deletion(&client)
    .await
    .unwrap();

  let active = contracts.get_active_contracts(&client, None).await.unwrap();
  assert!(active.is_empty());
}

// ─── End to end ──────────────────────────────────────────────────────────────

fn orchestrator(
  s: &SqliteStore,
) -> ClientOrchestrator<SqliteStore, SqliteStore> {
  let persons = PersonService::new(s.clone());
  let companies = CompanyService::new(s.clone());

  let registry = HandlerRegistry::new(vec![
    ClientHandler::Person(PersonHandler::new(persons.clone())),
    ClientHandler::Company(CompanyHandler::new(companies.clone())),
  ])
  .expect("registry");
  let resolver = ClientResolver::new(persons, companies);

  ClientOrchestrator::new(registry, resolver)
}

#[tokio::test]
async fn client_lifecycle_end_to_end() {
  let s = store().await;
  let orch = orchestrator(&s);
  let contracts = ContractService::new(s.clone());

  // Create a person through the generic payload path.
  let created = orch
    .create_client(ClientPayload::Person(PersonPayload {
      id:        None,
      name:      "John".into(),
      email:     "john@example.com".into(),
      phone:     None,
      birthdate: NaiveDate::from_ymd_opt(1980, 1, 1),
    }))
    .await
    .unwrap();
  let ClientPayload::Person(created) = created else {
    panic!("created a person")
  };
  let id = created.id.expect("id assigned");

  // Attach an open-ended contract; the start date defaults to today.
  let resolver = ClientResolver::new(
    PersonService::new(s.clone()),
    CompanyService::new(s.clone()),
  );
  let client = resolver
    .resolve(ClientKind::Person, id)
    .await
    .unwrap()
    .expect("client resolves");

  let c = contracts
    .create_contract(NewContract {
      client_id:   id,
      start_date:  None,
      end_date:    None,
      cost_amount: 100.0,
    })
    .await
    .unwrap();
  assert_eq!(c.start_date, Local::now().date_naive());

  let active = contracts.get_active_contracts(&client, None).await.unwrap();
  assert_eq!(active.len(), 1);
  let total = contracts
    .get_total_active_contracts_amount(&client)
    .await
    .unwrap();
  assert_eq!(total, 100.0);

  // A partial update keeps the birthdate.
  orch
    .update_client(
      ClientKind::Person,
      id,
      ClientPatch { name: Some("Johnny".into()), ..Default::default() },
    )
    .await
    .unwrap();
  let stored = PersonStore::find_by_id(&s, id)
    .await
    .unwrap()
    .expect("person still there");
  assert_eq!(stored.name, "Johnny");
  assert_eq!(
    stored.birthdate,
    NaiveDate::from_ymd_opt(1980, 1, 1).unwrap()
  );

  // Deletion cascades: client gone, contracts gone, active set empty.
  orch.delete_client(ClientKind::Person, id).await.unwrap();
  assert!(PersonStore::find_by_id(&s, id).await.unwrap().is_none());
  assert!(ContractStore::find_by_id(&s, c.id).await.unwrap().is_none());
  let active = contracts.get_active_contracts(&client, None).await.unwrap();
  assert!(active.is_empty());
}
