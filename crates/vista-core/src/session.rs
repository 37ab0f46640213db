//! Session-scoped state: load caches keyed by source identity and the
//! dashboards built over them.
//!
//! Nothing here is shared across sessions. A session lives until
//! [`SessionStore::end`] or process exit.

use std::{
  collections::HashMap,
  fmt,
  future::Future,
  sync::Arc,
};

use rand::{SeedableRng as _, rngs::StdRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Result,
  dashboard::{DashboardSettings, IncidentDashboard, InventoryDashboard},
  incident::IncidentDataset,
  inventory::InventoryRow,
  source::{IncidentSource, InventorySource, SourceKey},
};

// ─── Load cache ──────────────────────────────────────────────────────────────

/// Loaded datasets keyed by [`SourceKey`]. Failed loads are not cached.
#[derive(Debug)]
pub struct LoadCache<T> {
  entries: HashMap<SourceKey, Arc<T>>,
}

impl<T> Default for LoadCache<T> {
  fn default() -> Self { Self { entries: HashMap::new() } }
}

impl<T> LoadCache<T> {
  pub fn get(&self, key: &SourceKey) -> Option<Arc<T>> { self.entries.get(key).cloned() }

  /// Return the cached value for `key`, or run `load` and cache its result.
  pub async fn get_or_try_load<F, Fut, E>(&mut self, key: SourceKey, load: F) -> Result<Arc<T>, E>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
  {
    if let Some(hit) = self.entries.get(&key) {
      tracing::debug!(source = %key, "load cache hit");
      return Ok(Arc::clone(hit));
    }
    let value = Arc::new(load().await?);
    self.entries.insert(key, Arc::clone(&value));
    Ok(value)
  }

  /// Drop the entry for `key`; the next load re-reads the source.
  pub fn invalidate(&mut self, key: &SourceKey) -> bool { self.entries.remove(key).is_some() }

  pub fn clear(&mut self) { self.entries.clear() }

  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

// ─── Session ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
  pub fn new() -> Self { Self(Uuid::new_v4()) }
}

impl Default for SessionId {
  fn default() -> Self { Self::new() }
}

impl fmt::Display for SessionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// One user's caches and dashboards.
#[derive(Default)]
pub struct Session {
  id:              SessionId,
  inventory_cache: LoadCache<Vec<InventoryRow>>,
  incident_cache:  LoadCache<IncidentDataset>,
  inventory:       Option<(SourceKey, InventoryDashboard)>,
  incidents:       Option<(SourceKey, IncidentDashboard)>,
}

impl Session {
  pub fn id(&self) -> SessionId { self.id }

  pub async fn load_inventory<S: InventorySource>(
    &mut self,
    source: &S,
  ) -> Result<Arc<Vec<InventoryRow>>> {
    let key = source.source_key();
    self
      .inventory_cache
      .get_or_try_load(key, || async { source.load().await.map_err(Into::into) })
      .await
  }

  pub async fn load_incidents<S: IncidentSource>(
    &mut self,
    source: &S,
  ) -> Result<Arc<IncidentDataset>> {
    let key = source.source_key();
    self
      .incident_cache
      .get_or_try_load(key, || async { source.load().await.map_err(Into::into) })
      .await
  }

  /// The inventory dashboard for `source`, built on first use.
  pub async fn inventory_dashboard<S: InventorySource>(
    &mut self,
    source: &S,
  ) -> Result<&mut InventoryDashboard> {
    let key = source.source_key();
    if self.inventory.as_ref().is_none_or(|(k, _)| *k != key) {
      let rows = self.load_inventory(source).await?;
      self.inventory = Some((key, InventoryDashboard::new(rows)));
    }
    self
      .inventory
      .as_mut()
      .map(|(_, dashboard)| dashboard)
      .ok_or_else(|| crate::Error::Query("inventory dashboard unavailable".into()))
  }

  /// The incident dashboard for `source`, built on first use.
  pub async fn incident_dashboard<S: IncidentSource>(
    &mut self,
    source: &S,
    settings: DashboardSettings,
  ) -> Result<&mut IncidentDashboard> {
    let key = source.source_key();
    if self.incidents.as_ref().is_none_or(|(k, _)| *k != key) {
      let dataset = self.load_incidents(source).await?;
      let dashboard = IncidentDashboard::new(dataset, settings, StdRng::from_entropy());
      self.incidents = Some((key, dashboard));
    }
    self
      .incidents
      .as_mut()
      .map(|(_, dashboard)| dashboard)
      .ok_or_else(|| crate::Error::Query("incident dashboard unavailable".into()))
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Sessions by id.
#[derive(Default)]
pub struct SessionStore {
  sessions: HashMap<SessionId, Session>,
}

impl SessionStore {
  pub fn begin(&mut self) -> SessionId {
    let session = Session::default();
    let id = session.id();
    self.sessions.insert(id, session);
    tracing::debug!(session = %id, "session started");
    id
  }

  pub fn get_mut(&mut self, id: SessionId) -> Option<&mut Session> { self.sessions.get_mut(&id) }

  pub fn end(&mut self, id: SessionId) -> bool { self.sessions.remove(&id).is_some() }

  pub fn len(&self) -> usize { self.sessions.len() }

  pub fn is_empty(&self) -> bool { self.sessions.is_empty() }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use super::*;
  use crate::{Error, filter::tests::dataset};

  struct CountingSource {
    key:   SourceKey,
    loads: AtomicUsize,
    fail:  bool,
  }

  impl CountingSource {
    fn new(name: &str) -> Self {
      Self { key: SourceKey::for_path(name), loads: AtomicUsize::new(0), fail: false }
    }
  }

  #[derive(Debug, thiserror::Error)]
  #[error("fixture unavailable")]
  struct FixtureError;

  impl From<FixtureError> for Error {
    fn from(e: FixtureError) -> Self { Error::Query(e.to_string()) }
  }

  impl IncidentSource for CountingSource {
    type Error = FixtureError;

    fn source_key(&self) -> SourceKey { self.key.clone() }

    async fn load(&self) -> Result<IncidentDataset, FixtureError> {
      self.loads.fetch_add(1, Ordering::SeqCst);
      if self.fail { Err(FixtureError) } else { Ok(dataset()) }
    }
  }

  impl InventorySource for CountingSource {
    type Error = FixtureError;

    fn source_key(&self) -> SourceKey { self.key.clone() }

    async fn load(&self) -> Result<Vec<InventoryRow>, FixtureError> {
      self.loads.fetch_add(1, Ordering::SeqCst);
      Ok(vec![InventoryRow {
        product:  "Arroz".into(),
        category: "Grãos".into(),
        quantity: 3,
        value:    9.0,
      }])
    }
  }

  #[tokio::test]
  async fn same_source_is_read_once() {
    let source = CountingSource::new("incidents-fixture.db");
    let mut session = Session::default();

    let a = session.load_incidents(&source).await.unwrap();
    let b = session.load_incidents(&source).await.unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(source.loads.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn invalidate_forces_a_reload() {
    let source = CountingSource::new("incidents-fixture.db");
    let mut cache: LoadCache<IncidentDataset> = LoadCache::default();

    let key = IncidentSource::source_key(&source);

    let load = || async { IncidentSource::load(&source).await };
    cache.get_or_try_load(key.clone(), load).await.unwrap();
    assert!(cache.invalidate(&key));
    cache.get_or_try_load(key, load).await.unwrap();
    assert_eq!(source.loads.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn failed_loads_are_not_cached() {
    let mut source = CountingSource::new("broken.db");
    source.fail = true;
    let mut session = Session::default();

    let err = session.load_incidents(&source).await.unwrap_err();
    assert!(matches!(err, Error::Query(_)));
    assert!(session.incident_cache.is_empty());

    session.load_incidents(&source).await.unwrap_err();
    assert_eq!(source.loads.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn dashboard_state_survives_repeated_lookups() {
    let source = CountingSource::new("incidents-fixture.db");
    let mut session = Session::default();

    let first = session
      .incident_dashboard(&source, DashboardSettings::default())
      .await
      .unwrap()
      .snapshot()
      .sample
      .clone();
    let again = session
      .incident_dashboard(&source, DashboardSettings::default())
      .await
      .unwrap()
      .snapshot()
      .sample
      .clone();
    assert_eq!(first, again);
    assert_eq!(source.loads.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn inventory_dashboard_built_from_cached_rows() {
    let source = CountingSource::new("estoque-fixture.csv");
    let mut session = Session::default();
    let dash = session.inventory_dashboard(&source).await.unwrap();
    assert_eq!(dash.rows().len(), 1);
    session.inventory_dashboard(&source).await.unwrap();
    assert_eq!(source.loads.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn sessions_are_independent() {
    let mut store = SessionStore::default();
    let a = store.begin();
    let b = store.begin();
    assert_ne!(a, b);
    assert_eq!(store.len(), 2);
    assert!(store.end(a));
    assert!(store.get_mut(a).is_none());
    assert!(store.get_mut(b).is_some());
  }
}
