//! Event-driven dashboards.
//!
//! Each dashboard owns its loaded data and its current filter values. A UI
//! action becomes an event; [`InventoryDashboard::apply`] and
//! [`IncidentDashboard::apply`] recompute only the derived views the event
//! affects and leave a render-ready snapshot behind.

mod incident;
mod inventory;

pub use incident::{
  IncidentDashboard, IncidentEvent, IncidentMetrics, IncidentSnapshot, RawTableView,
};
pub use inventory::{
  InventoryDashboard, InventoryEvent, InventorySnapshot, StockChart, TableRow, TableSection,
};
use serde::{Deserialize, Serialize};

use crate::{
  InsufficientData,
  aggregate::{DEFAULT_BINS, DEFAULT_TOP_N},
  incident::Section,
  words::{DEFAULT_MAX_WORDS, StopWords},
};

// ─── Settings ────────────────────────────────────────────────────────────────

/// Tunables shared by the aggregations.
#[derive(Debug, Clone)]
pub struct DashboardSettings {
  pub top_n:          usize,
  pub histogram_bins: usize,
  pub max_words:      usize,
  pub stop_words:     StopWords,
}

impl Default for DashboardSettings {
  fn default() -> Self {
    Self {
      top_n:          DEFAULT_TOP_N,
      histogram_bins: DEFAULT_BINS,
      max_words:      DEFAULT_MAX_WORDS,
      stop_words:     StopWords::default(),
    }
  }
}

// ─── Panel ───────────────────────────────────────────────────────────────────

/// The content of one snapshot panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Panel<T> {
  Ready { data: T },
  /// Nothing to aggregate under the current filters.
  InsufficientData,
  /// The section feeding this panel failed to load.
  Degraded { reason: String },
}

impl<T> Panel<T> {
  pub fn ready(data: T) -> Self { Self::Ready { data } }

  pub fn as_ready(&self) -> Option<&T> {
    match self {
      Self::Ready { data } => Some(data),
      _ => None,
    }
  }

  /// Panel for an aggregation over `section`; a degraded section wins over
  /// whatever `f` would compute.
  pub fn from_section<S>(
    section: &Section<S>,
    f: impl FnOnce() -> Result<T, InsufficientData>,
  ) -> Self {
    match section.degraded_reason() {
      Some(reason) => Self::Degraded { reason: reason.to_owned() },
      None => f().into(),
    }
  }
}

impl<T> From<Result<T, InsufficientData>> for Panel<T> {
  fn from(result: Result<T, InsufficientData>) -> Self {
    match result {
      Ok(data) => Self::ready(data),
      Err(InsufficientData) => Self::InsufficientData,
    }
  }
}

// ─── Recomputed ──────────────────────────────────────────────────────────────

/// Which derived views an event recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Recomputed {
  /// The filtered view and every aggregate over it.
  pub aggregates: bool,
  /// A new narrative sample was drawn.
  pub sample:     bool,
  pub table:      bool,
  pub chart:      bool,
}

impl Recomputed {
  pub fn any(&self) -> bool { self.aggregates || self.sample || self.table || self.chart }
}
