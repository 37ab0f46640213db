//! Source traits implemented by the loaders.
//!
//! `vista-csv` implements [`InventorySource`] and `vista-store-sqlite`
//! implements [`IncidentSource`]. The session layer only sees these traits,
//! so tests can substitute in-memory sources.

use std::{
  fmt,
  future::Future,
  path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{incident::IncidentDataset, inventory::InventoryRow};

// ─── Source identity ─────────────────────────────────────────────────────────

/// Identity of a data source, used as the load-cache key.
///
/// Built from the canonical path when the file exists, so `./a.db` and
/// `a.db` share a cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceKey(PathBuf);

impl SourceKey {
  pub fn for_path(path: impl AsRef<Path>) -> Self {
    let path = path.as_ref();
    Self(std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()))
  }

  pub fn path(&self) -> &Path { &self.0 }
}

impl fmt::Display for SourceKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.display())
  }
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// A source of inventory rows.
pub trait InventorySource: Send + Sync {
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  fn source_key(&self) -> SourceKey;

  /// Read every row. Must not write to the source.
  fn load(
    &self,
  ) -> impl Future<Output = Result<Vec<InventoryRow>, Self::Error>> + Send + '_;
}

/// A source of incident records and their dependent tables.
pub trait IncidentSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  fn source_key(&self) -> SourceKey;

  /// Read the fact table (mandatory) and the dependent sections (each
  /// allowed to degrade on its own).
  fn load(
    &self,
  ) -> impl Future<Output = Result<IncidentDataset, Self::Error>> + Send + '_;
}
