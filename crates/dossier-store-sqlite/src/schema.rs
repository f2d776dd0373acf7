//! SQL schema for the Dossier SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One table for both client variants. `kind` discriminates; the variant
-- columns (`birthdate`, `company_identifier`) are NULL for the other kind.
CREATE TABLE IF NOT EXISTS clients (
    client_id          TEXT PRIMARY KEY,
    kind               TEXT NOT NULL,   -- 'person' | 'company'
    name               TEXT NOT NULL,
    email              TEXT NOT NULL,
    phone              TEXT,
    birthdate          TEXT,            -- ISO date; persons only
    company_identifier TEXT UNIQUE,     -- natural key; companies only
    created_at         TEXT NOT NULL,   -- ISO date
    updated_at         TEXT NOT NULL    -- ISO date
);

CREATE TABLE IF NOT EXISTS contracts (
    contract_id   TEXT PRIMARY KEY,
    client_id     TEXT NOT NULL REFERENCES clients(client_id),
    start_date    TEXT NOT NULL,        -- ISO date
    end_date      TEXT,                 -- ISO date; NULL while open-ended
    cost_amount   REAL NOT NULL,
    last_modified TEXT NOT NULL,        -- RFC 3339 UTC
    created_at    TEXT NOT NULL         -- RFC 3339 UTC
);

CREATE INDEX IF NOT EXISTS contracts_client_idx ON contracts(client_id);
CREATE INDEX IF NOT EXISTS clients_kind_idx     ON clients(kind);

PRAGMA user_version = 1;
";
