//! [`SqliteIncidents`]: the SQLite implementation of [`IncidentSource`].

use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
};

use rusqlite::OpenFlags;
use strum::IntoEnumIterator as _;
use vista_core::{
  incident::{IncidentDataset, RawTable, Section, SourceTable, Victim, ViolenceTag},
  source::{IncidentSource, SourceKey},
};

use crate::{
  Error, Result,
  decode::{RawIncident, cell_text, victim_from_row},
  schema::{SELECT_INCIDENTS, SELECT_TAGS, SELECT_VICTIMS},
};

// ─── Source ──────────────────────────────────────────────────────────────────

/// An incident database file, opened read-only on each load.
#[derive(Debug, Clone)]
pub struct SqliteIncidents {
  path: PathBuf,
}

/// Everything read in one trip to the connection thread. Sections keep their
/// own result so one failing table does not sink the others.
struct RawDataset {
  incidents:  rusqlite::Result<Vec<RawIncident>>,
  victims:    rusqlite::Result<Vec<Victim>>,
  tags:       rusqlite::Result<Vec<ViolenceTag>>,
  raw_tables: Vec<(SourceTable, rusqlite::Result<RawTable>)>,
}

impl SqliteIncidents {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }

  async fn open(&self) -> Result<tokio_rusqlite::Connection> {
    match tokio::fs::metadata(&self.path).await {
      Ok(_) => {}
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        return Err(Error::SourceNotFound(self.path.clone()));
      }
      Err(e) => return Err(e.into()),
    }
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    Ok(tokio_rusqlite::Connection::open_with_flags(&self.path, flags).await?)
  }

  async fn read_all(&self) -> Result<RawDataset> {
    let conn = self.open().await?;
    let raw = conn
      .call(|conn| {
        Ok(RawDataset {
          incidents:  read_incidents(conn),
          victims:    read_victims(conn),
          tags:       read_tags(conn),
          raw_tables: SourceTable::iter()
            .map(|table| (table, read_raw_table(conn, table)))
            .collect(),
        })
      })
      .await?;
    Ok(raw)
  }
}

// ─── Queries ─────────────────────────────────────────────────────────────────

fn read_incidents(conn: &rusqlite::Connection) -> rusqlite::Result<Vec<RawIncident>> {
  let mut stmt = conn.prepare(SELECT_INCIDENTS)?;
  let rows = stmt
    .query_map([], |row| {
      Ok(RawIncident {
        id:           row.get(0)?,
        date:         row.get(1)?,
        description:  row.get(2)?,
        municipality: row.get(3)?,
        state:        row.get(4)?,
        territory:    row.get(5)?,
        source:       row.get(6)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn read_victims(conn: &rusqlite::Connection) -> rusqlite::Result<Vec<Victim>> {
  let mut stmt = conn.prepare(SELECT_VICTIMS)?;
  let rows = stmt
    .query_map([], victim_from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn read_tags(conn: &rusqlite::Connection) -> rusqlite::Result<Vec<ViolenceTag>> {
  let mut stmt = conn.prepare(SELECT_TAGS)?;
  let rows = stmt
    .query_map([], |row| {
      Ok(ViolenceTag {
        incident_id:   row.get(0)?,
        violence_type: row.get(1)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn read_raw_table(conn: &rusqlite::Connection, table: SourceTable) -> rusqlite::Result<RawTable> {
  // Table names come from `SourceTable`, never from user input.
  let mut stmt = conn.prepare(&format!("SELECT * FROM \"{table}\""))?;
  let columns: Vec<String> = stmt.column_names().into_iter().map(str::to_owned).collect();
  let width = columns.len();

  let rows = stmt
    .query_map([], |row| {
      (0..width)
        .map(|i| row.get_ref(i).map(cell_text))
        .collect::<rusqlite::Result<Vec<String>>>()
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(RawTable { name: table.to_string(), columns, rows })
}

// ─── IncidentSource impl ─────────────────────────────────────────────────────

impl IncidentSource for SqliteIncidents {
  type Error = Error;

  fn source_key(&self) -> SourceKey { SourceKey::for_path(&self.path) }

  async fn load(&self) -> Result<IncidentDataset> {
    tracing::info!(path = %self.path.display(), "loading incident database");
    let raw = self.read_all().await?;

    let incidents = raw
      .incidents?
      .into_iter()
      .map(RawIncident::into_incident)
      .collect::<Result<Vec<_>>>()?;

    let victims: Section<_> = raw.victims.into();
    let tags: Section<_> = raw.tags.into();
    let degraded = [("victims", victims.degraded_reason()), ("tags", tags.degraded_reason())];
    for (name, reason) in degraded {
      if let Some(reason) = reason {
        tracing::warn!(section = name, %reason, "section degraded");
      }
    }

    let raw_tables: BTreeMap<SourceTable, Section<RawTable>> = raw
      .raw_tables
      .into_iter()
      .map(|(table, result)| {
        if let Err(e) = &result {
          tracing::warn!(%table, error = %e, "raw table unavailable");
        }
        (table, result.into())
      })
      .collect();

    tracing::info!(
      incidents = incidents.len(),
      victims = ?victims.as_ready().map(Vec::len),
      tags = ?tags.as_ready().map(Vec::len),
      "loaded incident database"
    );

    Ok(IncidentDataset { incidents, victims, tags, raw_tables })
  }
}
