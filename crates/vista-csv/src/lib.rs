//! Inventory CSV loader for vista.
//!
//! Reads a stock file with `Product, Category, Quantity, Value` columns (or
//! their Portuguese names) into [`vista_core::inventory::InventoryRow`]s.
//!
//! # Quick start
//!
//! ```no_run
//! use vista_core::source::InventorySource as _;
//! use vista_csv::CsvInventory;
//!
//! # async fn run() -> vista_csv::Result<()> {
//! let rows = CsvInventory::new("estoque.csv").load().await?;
//! println!("{} rows", rows.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
mod parse;

use std::path::{Path, PathBuf};

pub use error::{Error, Result};
pub use parse::read_rows;
use vista_core::{
  inventory::InventoryRow,
  source::{InventorySource, SourceKey},
};

/// An inventory CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvInventory {
  path: PathBuf,
}

impl CsvInventory {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }
}

impl InventorySource for CsvInventory {
  type Error = Error;

  fn source_key(&self) -> SourceKey { SourceKey::for_path(&self.path) }

  async fn load(&self) -> Result<Vec<InventoryRow>> {
    let bytes = match tokio::fs::read(&self.path).await {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        return Err(Error::SourceNotFound(self.path.clone()));
      }
      Err(e) => return Err(e.into()),
    };

    let rows = read_rows(bytes.as_slice())?;
    tracing::info!(path = %self.path.display(), rows = rows.len(), "loaded inventory");
    Ok(rows)
  }
}
