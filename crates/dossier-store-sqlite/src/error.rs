//! Error type for `dossier-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] dossier_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A variant column required by the row's kind is NULL.
  #[error("client {id} has no value in its {column} column")]
  MissingColumn { id: String, column: &'static str },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
