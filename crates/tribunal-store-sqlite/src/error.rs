//! Error type for `tribunal-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A domain failure detected while applying a write (missing record,
  /// forbidden transition).
  #[error(transparent)]
  Core(#[from] tribunal_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A column held a value outside its domain.
  #[error("decode error: {0}")]
  Decode(String),
}

impl From<Error> for tribunal_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(core) => core,
      other => tribunal_core::Error::Store(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
