//! Error type for `vista-store-sqlite`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database not found: {}", .0.display())]
  SourceNotFound(PathBuf),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("query error: {0}")]
  Query(#[from] rusqlite::Error),

  #[error("incident {id}: invalid date {value:?}")]
  DateParse { id: i64, value: String },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for vista_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::SourceNotFound(path) => Self::SourceNotFound(path),
      other => Self::Query(other.to_string()),
    }
  }
}
