//! Error types for the inventory CSV loader.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("file not found: {}", .0.display())]
  SourceNotFound(PathBuf),

  #[error("missing column {0:?}")]
  MissingColumn(&'static str),

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

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
