//! Filter composer: membership predicates and the semi-joins that carry a
//! filtered incident set over to its dependent tables.
//!
//! Every function borrows from the dataset and returns a new view; nothing
//! here mutates a base table.

use std::{
  borrow::Borrow,
  collections::{BTreeSet, HashSet},
};

use serde::{Deserialize, Serialize};

use crate::incident::{Incident, IncidentDataset, Victim, ViolenceTag};

// ─── Selection ───────────────────────────────────────────────────────────────

/// The value set of one multi-select filter.
///
/// `Any` disables the predicate. `Only` with an empty set matches nothing:
/// deselecting every option empties the view rather than lifting the filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum Selection<T: Ord> {
  Any,
  Only(BTreeSet<T>),
}

impl<T: Ord> Default for Selection<T> {
  fn default() -> Self { Self::Any }
}

impl<T: Ord> Selection<T> {
  pub fn only(values: impl IntoIterator<Item = T>) -> Self {
    Self::Only(values.into_iter().collect())
  }

  /// The empty selection.
  pub fn none() -> Self { Self::Only(BTreeSet::new()) }

  /// Every value in `options`. With no options to pick from there is
  /// nothing to narrow by, so the predicate stays inactive.
  pub fn every(options: impl IntoIterator<Item = T>) -> Self {
    let values: BTreeSet<T> = options.into_iter().collect();
    if values.is_empty() { Self::Any } else { Self::Only(values) }
  }

  pub fn is_active(&self) -> bool { matches!(self, Self::Only(_)) }

  pub fn contains<Q>(&self, value: &Q) -> bool
  where
    T: Borrow<Q>,
    Q: Ord + ?Sized,
  {
    match self {
      Self::Any => true,
      Self::Only(values) => values.contains(value),
    }
  }

  /// Like [`Self::contains`]; a missing value only passes an inactive
  /// predicate.
  pub fn contains_opt<Q>(&self, value: Option<&Q>) -> bool
  where
    T: Borrow<Q>,
    Q: Ord + ?Sized,
  {
    match (self, value) {
      (Self::Any, _) => true,
      (Self::Only(_), None) => false,
      (Self::Only(values), Some(v)) => values.contains(v),
    }
  }
}

impl<T: Ord + Clone> Selection<T> {
  /// Flip `value` in or out of the selection. An inactive selection is first
  /// expanded to `universe`, so toggling from "everything" removes one value.
  pub fn toggle(&mut self, value: T, universe: &[T]) {
    if let Self::Any = self {
      *self = Self::only(universe.iter().cloned());
    }
    if let Self::Only(values) = self
      && !values.remove(&value)
    {
      values.insert(value);
    }
  }
}

// ─── Incident filter ─────────────────────────────────────────────────────────

/// The active predicates of the incident dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentFilter {
  pub years:          Selection<i32>,
  pub states:         Selection<String>,
  pub violence_types: Selection<String>,
}

impl IncidentFilter {
  /// Every option of every filter selected, the way the dashboard starts.
  ///
  /// A filter with no options (its section failed to load, or holds no
  /// rows) starts inactive instead of empty.
  pub fn all_selected(options: &FilterOptions) -> Self {
    Self {
      years:          Selection::every(options.years.iter().copied()),
      states:         Selection::every(options.states.iter().cloned()),
      violence_types: Selection::every(options.violence_types.iter().cloned()),
    }
  }
}

/// The values offered by each filter control, sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
  pub years:          Vec<i32>,
  pub states:         Vec<String>,
  pub violence_types: Vec<String>,
}

impl FilterOptions {
  pub fn from_dataset(dataset: &IncidentDataset) -> Self {
    let years: BTreeSet<i32> = dataset.incidents.iter().map(|i| i.year).collect();
    let states: BTreeSet<&str> = dataset
      .incidents
      .iter()
      .filter_map(|i| i.state.as_deref())
      .collect();
    let violence_types: BTreeSet<&str> = dataset
      .tags()
      .iter()
      .map(|t| t.violence_type.as_str())
      .collect();

    Self {
      years:          years.into_iter().collect(),
      states:         states.into_iter().map(str::to_owned).collect(),
      violence_types: violence_types.into_iter().map(str::to_owned).collect(),
    }
  }
}

// ─── Predicates ──────────────────────────────────────────────────────────────

pub fn by_year<'a>(
  incidents: impl IntoIterator<Item = &'a Incident>,
  years: &Selection<i32>,
) -> Vec<&'a Incident> {
  incidents
    .into_iter()
    .filter(|i| years.contains(&i.year))
    .collect()
}

pub fn by_state<'a>(
  incidents: impl IntoIterator<Item = &'a Incident>,
  states: &Selection<String>,
) -> Vec<&'a Incident> {
  incidents
    .into_iter()
    .filter(|i| states.contains_opt(i.state.as_deref()))
    .collect()
}

/// Ids of incidents carrying at least one tag whose type is selected.
pub fn tagged_incident_ids(tags: &[ViolenceTag], types: &Selection<String>) -> HashSet<i64> {
  tags
    .iter()
    .filter(|t| types.contains(t.violence_type.as_str()))
    .map(|t| t.incident_id)
    .collect()
}

/// Keep incidents that have a tag in `types`: tags → distinct ids → incidents.
///
/// With an inactive selection every incident passes, including untagged
/// ones.
pub fn by_violence_type<'a>(
  incidents: impl IntoIterator<Item = &'a Incident>,
  tags: &[ViolenceTag],
  types: &Selection<String>,
) -> Vec<&'a Incident> {
  if !types.is_active() {
    return incidents.into_iter().collect();
  }
  let ids = tagged_incident_ids(tags, types);
  incidents
    .into_iter()
    .filter(|i| ids.contains(&i.id))
    .collect()
}

/// Rows of a dependent table whose foreign key is in `ids`.
pub fn semi_join<'a, T>(
  rows: &'a [T],
  ids: &HashSet<i64>,
  key: impl Fn(&T) -> i64,
) -> Vec<&'a T> {
  rows.iter().filter(|row| ids.contains(&key(*row))).collect()
}

// ─── View ────────────────────────────────────────────────────────────────────

/// The incidents passing a filter plus the dependent rows that reference
/// them.
#[derive(Debug, Clone, Default)]
pub struct IncidentView<'a> {
  pub incidents: Vec<&'a Incident>,
  pub victims:   Vec<&'a Victim>,
  pub tags:      Vec<&'a ViolenceTag>,
  ids:           HashSet<i64>,
}

impl IncidentView<'_> {
  pub fn contains_incident(&self, id: i64) -> bool { self.ids.contains(&id) }

  pub fn incident_ids(&self) -> &HashSet<i64> { &self.ids }
}

/// Apply `filter` to `dataset`.
pub fn compose<'a>(dataset: &'a IncidentDataset, filter: &IncidentFilter) -> IncidentView<'a> {
  let incidents = by_year(&dataset.incidents, &filter.years);
  let incidents = by_state(incidents, &filter.states);
  let incidents = by_violence_type(incidents, dataset.tags(), &filter.violence_types);

  let ids: HashSet<i64> = incidents.iter().map(|i| i.id).collect();
  let victims = semi_join(dataset.victims(), &ids, |v| v.incident_id);
  let tags = semi_join(dataset.tags(), &ids, |t| t.incident_id);

  IncidentView { incidents, victims, tags, ids }
}
