//! Incident records, their dependent tables and the loaded dataset.
//!
//! Everything here is read-only once loaded. Filtering produces borrowed
//! views (see [`crate::filter`]); the dataset itself is never mutated.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

// ─── Source tables ───────────────────────────────────────────────────────────

/// The eight tables of the incident database.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr,
  EnumIter, EnumString, Serialize, Deserialize,
)]
pub enum SourceTable {
  Incidentes,
  Vitimas,
  #[strum(serialize = "Incidentes_Tipos_Violencia")]
  #[serde(rename = "Incidentes_Tipos_Violencia")]
  IncidentesTiposViolencia,
  Municipios,
  #[strum(serialize = "Terras_Indigenas")]
  #[serde(rename = "Terras_Indigenas")]
  TerrasIndigenas,
  Povos,
  Fontes,
  #[strum(serialize = "Tipos_Violencia")]
  #[serde(rename = "Tipos_Violencia")]
  TiposViolencia,
}

// ─── Fact and dependent rows ─────────────────────────────────────────────────

/// One recorded event, with its dimension labels already joined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
  pub id:           i64,
  pub date:         NaiveDate,
  /// Always `date.year()`; kept as a column because every filter uses it.
  pub year:         i32,
  pub description:  Option<String>,
  pub municipality: Option<String>,
  /// Two-letter state code of the municipality.
  pub state:        Option<String>,
  pub territory:    Option<String>,
  pub source:       Option<String>,
}

impl Incident {
  /// Description if present and not blank.
  pub fn narrative(&self) -> Option<&str> {
    self
      .description
      .as_deref()
      .filter(|d| !d.trim().is_empty())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Victim {
  pub id:          i64,
  pub incident_id: i64,
  pub name:        Option<String>,
  pub alias:       Option<String>,
  pub age:         Option<u32>,
  pub village:     Option<String>,
  /// Name of the people (ethnicity) the victim belongs to.
  pub people:      Option<String>,
}

/// Links an incident to one violence type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolenceTag {
  pub incident_id:   i64,
  pub violence_type: String,
}

/// A source table as-is, stringified for browsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
  pub name:    String,
  pub columns: Vec<String>,
  pub rows:    Vec<Vec<String>>,
}

// ─── Sections ────────────────────────────────────────────────────────────────

/// A part of the dataset loaded independently of the fact table.
///
/// A degraded section keeps the rest of the dashboard alive; only the panels
/// that consume it report the failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Section<T> {
  Ready { data: T },
  Degraded { reason: String },
}

impl<T> Section<T> {
  pub fn ready(data: T) -> Self { Self::Ready { data } }

  pub fn degraded(reason: impl Into<String>) -> Self {
    Self::Degraded { reason: reason.into() }
  }

  pub fn as_ready(&self) -> Option<&T> {
    match self {
      Self::Ready { data } => Some(data),
      Self::Degraded { .. } => None,
    }
  }

  pub fn degraded_reason(&self) -> Option<&str> {
    match self {
      Self::Ready { .. } => None,
      Self::Degraded { reason } => Some(reason),
    }
  }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for Section<T> {
  fn from(result: Result<T, E>) -> Self {
    match result {
      Ok(data) => Self::ready(data),
      Err(e) => Self::degraded(e.to_string()),
    }
  }
}

// ─── Dataset ─────────────────────────────────────────────────────────────────

/// Everything the incident dashboard reads, loaded once per source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentDataset {
  pub incidents:  Vec<Incident>,
  pub victims:    Section<Vec<Victim>>,
  pub tags:       Section<Vec<ViolenceTag>>,
  pub raw_tables: BTreeMap<SourceTable, Section<RawTable>>,
}

impl IncidentDataset {
  /// A dataset with only the fact table; dependent sections are empty.
  pub fn from_incidents(incidents: Vec<Incident>) -> Self {
    Self {
      incidents,
      victims: Section::ready(Vec::new()),
      tags: Section::ready(Vec::new()),
      raw_tables: BTreeMap::new(),
    }
  }

  /// Victims, or an empty slice when the section is degraded.
  pub fn victims(&self) -> &[Victim] {
    self.victims.as_ready().map(Vec::as_slice).unwrap_or_default()
  }

  /// Violence tags, or an empty slice when the section is degraded.
  pub fn tags(&self) -> &[ViolenceTag] {
    self.tags.as_ready().map(Vec::as_slice).unwrap_or_default()
  }
}
