//! Core types for the vista dashboards.
//!
//! Holds the domain model, the filter composer, the aggregators and the
//! session/event machinery. Free of CSV, database and terminal dependencies;
//! the loaders (`vista-csv`, `vista-store-sqlite`) and the renderers
//! (`vista-cli`) all depend on it.

pub mod aggregate;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod incident;
pub mod inventory;
pub mod sample;
pub mod session;
pub mod source;
pub mod words;

pub use error::{Error, InsufficientData, Result};
