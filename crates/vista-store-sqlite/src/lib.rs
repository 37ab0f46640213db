//! SQLite loader for the incident database.
//!
//! Wraps [`tokio_rusqlite`] so the read runs on its own thread without
//! blocking the async runtime. The database is opened read-only.

mod decode;
mod store;

pub mod error;
pub mod schema;

pub use error::{Error, Result};
pub use store::SqliteIncidents;
