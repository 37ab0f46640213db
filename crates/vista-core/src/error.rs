//! Error types for `vista-core`.

use std::path::PathBuf;

use thiserror::Error;

/// A failure to produce a dataset from its source.
///
/// Both kinds are terminal for the current load: the caller reports them and
/// renders nothing from the affected source.
#[derive(Debug, Error)]
pub enum Error {
  /// The backing file does not exist.
  #[error("source not found: {}", .0.display())]
  SourceNotFound(PathBuf),

  /// The source exists but could not be read as expected (malformed data,
  /// missing table, schema mismatch).
  #[error("query error: {0}")]
  Query(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returned by aggregators that tolerate empty input instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("insufficient data")]
pub struct InsufficientData;
