//! Incident dashboard: metrics, charts, word cloud, narrative sample and the
//! raw-table explorer over one filtered view.

use std::sync::Arc;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::{DashboardSettings, Panel, Recomputed};
use crate::{
  InsufficientData,
  aggregate::{Histogram, distinct_count, group_count, histogram, top_n},
  filter::{FilterOptions, IncidentFilter, IncidentView, Selection, compose},
  incident::{IncidentDataset, RawTable, Section, SourceTable},
  sample::{NarrativeSample, SampleState},
  words::{WordWeight, word_frequencies},
};

// ─── Events ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum IncidentEvent {
  Years(Selection<i32>),
  States(Selection<String>),
  ViolenceTypes(Selection<String>),
  /// The "new sample" action.
  Resample,
  RawTable(SourceTable),
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentMetrics {
  pub incidents:      usize,
  /// `None` when the victims section failed to load.
  pub victims:        Option<usize>,
  pub municipalities: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTableView {
  pub table:   SourceTable,
  pub content: Panel<RawTable>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentSnapshot {
  pub filter:             IncidentFilter,
  pub metrics:            IncidentMetrics,
  /// Incidents per year, by year.
  pub per_year:           Vec<(i32, usize)>,
  /// Incidents per state, by state code.
  pub per_state:          Vec<(String, usize)>,
  pub top_municipalities: Vec<(String, usize)>,
  /// Victims per people.
  pub top_peoples:        Panel<Vec<(String, usize)>>,
  /// Tags per violence type.
  pub top_violence_types: Panel<Vec<(String, usize)>>,
  pub age_histogram:      Panel<Histogram>,
  pub word_cloud:         Panel<Vec<WordWeight>>,
  pub sample:             Panel<NarrativeSample>,
  pub raw:                RawTableView,
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

pub struct IncidentDashboard {
  dataset:  Arc<IncidentDataset>,
  settings: DashboardSettings,
  options:  FilterOptions,
  filter:   IncidentFilter,
  sample:   SampleState,
  rng:      StdRng,
  snapshot: IncidentSnapshot,
}

impl IncidentDashboard {
  /// Start with every filter option selected and the first table open in the
  /// explorer.
  pub fn new(dataset: Arc<IncidentDataset>, settings: DashboardSettings, rng: StdRng) -> Self {
    let options = FilterOptions::from_dataset(&dataset);
    let filter = IncidentFilter::all_selected(&options);
    let raw = raw_view(&dataset, SourceTable::Incidentes);

    let mut dashboard = Self {
      snapshot: IncidentSnapshot {
        filter: filter.clone(),
        metrics: IncidentMetrics { incidents: 0, victims: Some(0), municipalities: 0 },
        per_year: Vec::new(),
        per_state: Vec::new(),
        top_municipalities: Vec::new(),
        top_peoples: Panel::InsufficientData,
        top_violence_types: Panel::InsufficientData,
        age_histogram: Panel::InsufficientData,
        word_cloud: Panel::InsufficientData,
        sample: Panel::InsufficientData,
        raw,
      },
      dataset,
      settings,
      options,
      filter,
      sample: SampleState::default(),
      rng,
    };
    dashboard.recompute_filtered();
    dashboard
  }

  pub fn snapshot(&self) -> &IncidentSnapshot { &self.snapshot }

  pub fn options(&self) -> &FilterOptions { &self.options }

  pub fn filter(&self) -> &IncidentFilter { &self.filter }

  pub fn dataset(&self) -> &Arc<IncidentDataset> { &self.dataset }

  pub fn apply(&mut self, event: IncidentEvent) -> Recomputed {
    tracing::debug!(?event, "incident event");
    match event {
      IncidentEvent::Years(years) => self.filter.years = years,
      IncidentEvent::States(states) => self.filter.states = states,
      IncidentEvent::ViolenceTypes(types) => self.filter.violence_types = types,
      IncidentEvent::Resample => {
        let view = compose(&self.dataset, &self.filter);
        let drawn = self.sample.reroll(&view, &mut self.rng);
        self.snapshot.sample = drawn.and_then(|()| current(&self.sample)).into();
        return Recomputed { sample: true, ..Default::default() };
      }
      IncidentEvent::RawTable(table) => {
        self.snapshot.raw = raw_view(&self.dataset, table);
        return Recomputed { table: true, ..Default::default() };
      }
    }
    self.recompute_filtered()
  }

  /// Rebuild the view and everything derived from it.
  fn recompute_filtered(&mut self) -> Recomputed {
    let view = compose(&self.dataset, &self.filter);
    let settings = &self.settings;

    let drawn = self.sample.refresh(&view, &mut self.rng);
    let sample = drawn.and_then(|_| current(&self.sample));

    let snapshot = &mut self.snapshot;
    snapshot.filter = self.filter.clone();
    snapshot.metrics = metrics(&self.dataset, &view);
    snapshot.per_year = group_count(view.incidents.iter().map(|i| i.year));
    snapshot.per_state = group_count(view.incidents.iter().filter_map(|i| i.state.clone()));
    snapshot.top_municipalities = top_n(
      view.incidents.iter().map(|i| i.municipality.clone()),
      settings.top_n,
    );
    snapshot.top_peoples = Panel::from_section(&self.dataset.victims, || {
      non_empty(top_n(view.victims.iter().map(|v| v.people.clone()), settings.top_n))
    });
    snapshot.top_violence_types = Panel::from_section(&self.dataset.tags, || {
      non_empty(top_n(
        view.tags.iter().map(|t| Some(t.violence_type.clone())),
        settings.top_n,
      ))
    });
    snapshot.age_histogram = Panel::from_section(&self.dataset.victims, || {
      histogram(
        view.victims.iter().map(|v| v.age.map(f64::from)),
        settings.histogram_bins,
      )
    });
    snapshot.word_cloud = word_frequencies(
      view.incidents.iter().map(|i| i.description.as_deref()),
      &settings.stop_words,
      settings.max_words,
    )
    .into();
    snapshot.sample = sample.into();

    Recomputed {
      aggregates: true,
      sample: drawn.unwrap_or(false),
      ..Default::default()
    }
  }
}

fn current(state: &SampleState) -> Result<NarrativeSample, InsufficientData> {
  state.current().cloned().ok_or(InsufficientData)
}

fn non_empty<T>(items: Vec<T>) -> Result<Vec<T>, InsufficientData> {
  if items.is_empty() { Err(InsufficientData) } else { Ok(items) }
}

fn metrics(dataset: &IncidentDataset, view: &IncidentView<'_>) -> IncidentMetrics {
  IncidentMetrics {
    incidents:      view.incidents.len(),
    victims:        dataset.victims.as_ready().map(|_| view.victims.len()),
    municipalities: distinct_count(view.incidents.iter().map(|i| i.municipality.as_deref())),
  }
}

fn raw_view(dataset: &IncidentDataset, table: SourceTable) -> RawTableView {
  let content = match dataset.raw_tables.get(&table) {
    Some(Section::Ready { data }) => Panel::ready(data.clone()),
    Some(Section::Degraded { reason }) => Panel::Degraded { reason: reason.clone() },
    None => Panel::InsufficientData,
  };
  RawTableView { table, content }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeMap;

  use rand::SeedableRng as _;

  use super::*;
  use crate::filter::tests::dataset;

  fn dashboard(dataset: IncidentDataset) -> IncidentDashboard {
    IncidentDashboard::new(
      Arc::new(dataset),
      DashboardSettings::default(),
      StdRng::seed_from_u64(42),
    )
  }

  #[test]
  fn starts_with_everything_selected() {
    let dash = dashboard(dataset());
    let snap = dash.snapshot();
    assert_eq!(snap.filter, IncidentFilter::all_selected(dash.options()));
    // Incident 5 has no state, incident 6 has no tag.
    assert_eq!(snap.metrics.incidents, 4);
    assert_eq!(snap.metrics.victims, Some(4));
    assert_eq!(snap.per_year, [(2019, 2), (2020, 2)]);
    assert_eq!(snap.per_state, [
      ("MA".to_string(), 1),
      ("MS".to_string(), 2),
      ("RR".to_string(), 1),
    ]);
    assert!(snap.sample.as_ready().is_some());
    assert!(snap.word_cloud.as_ready().is_some());
  }

  #[test]
  fn metrics_count_distinct_municipalities() {
    let mut dash = dashboard(dataset());
    dash.apply(IncidentEvent::States(Selection::Any));
    dash.apply(IncidentEvent::ViolenceTypes(Selection::Any));
    let snap = dash.snapshot();
    assert_eq!(snap.metrics.incidents, 6);
    assert_eq!(snap.metrics.victims, Some(5));
    // ids mod 3 → three municipalities.
    assert_eq!(snap.metrics.municipalities, 3);
  }

  #[test]
  fn filter_events_recompute_aggregates() {
    let mut dash = dashboard(dataset());
    let recomputed = dash.apply(IncidentEvent::Years(Selection::only([2019])));
    assert!(recomputed.aggregates);
    assert!(!recomputed.table);
    assert_eq!(dash.snapshot().per_year, [(2019, 2)]);
    assert_eq!(dash.filter().years, Selection::only([2019]));
  }

  #[test]
  fn top_peoples_ranked_from_filtered_victims() {
    let mut dash = dashboard(dataset());
    dash.apply(IncidentEvent::States(Selection::Any));
    dash.apply(IncidentEvent::ViolenceTypes(Selection::Any));
    let peoples = dash.snapshot().top_peoples.as_ready().cloned().unwrap();
    assert_eq!(peoples, [
      ("Yanomami".to_string(), 1),
      ("Guajajara".to_string(), 2),
      ("Guarani Kaiowá".to_string(), 2),
    ]);
  }

  #[test]
  fn age_histogram_skips_missing_ages() {
    let mut dash = dashboard(dataset());
    dash.apply(IncidentEvent::States(Selection::Any));
    dash.apply(IncidentEvent::ViolenceTypes(Selection::Any));
    let hist = dash.snapshot().age_histogram.as_ready().cloned().unwrap();
    assert_eq!(hist.bins.len(), 20);
    // Victim 12 has no age.
    assert_eq!(hist.total(), 4);
  }

  #[test]
  fn deselecting_everything_empties_every_panel() {
    let mut dash = dashboard(dataset());
    dash.apply(IncidentEvent::ViolenceTypes(Selection::none()));
    let snap = dash.snapshot();
    assert_eq!(snap.metrics.incidents, 0);
    assert_eq!(snap.metrics.victims, Some(0));
    assert!(snap.per_year.is_empty());
    assert_eq!(snap.word_cloud, Panel::InsufficientData);
    assert_eq!(snap.age_histogram, Panel::InsufficientData);
    assert_eq!(snap.sample, Panel::InsufficientData);
    assert_eq!(snap.top_peoples, Panel::InsufficientData);
  }

  #[test]
  fn sample_is_stable_until_its_incident_is_filtered_out() {
    let mut dash = dashboard(dataset());
    let first = dash.snapshot().sample.as_ready().cloned().unwrap();

    // Re-applying the same filter keeps the sample.
    let years = dash.filter().years.clone();
    let recomputed = dash.apply(IncidentEvent::Years(years));
    assert!(!recomputed.sample);
    assert_eq!(dash.snapshot().sample.as_ready(), Some(&first));

    // Dropping the sample's year forces a new draw.
    let mut years = dash.filter().years.clone();
    let held_year = dash
      .dataset()
      .incidents
      .iter()
      .find(|i| i.id == first.incident_id)
      .unwrap()
      .year;
    years.toggle(held_year, &dash.options().years);
    let recomputed = dash.apply(IncidentEvent::Years(years));
    let next = dash.snapshot().sample.as_ready().unwrap();
    assert!(recomputed.sample);
    assert_ne!(next.incident_id, first.incident_id);
  }

  #[test]
  fn resample_only_touches_sample() {
    let mut dash = dashboard(dataset());
    let before = dash.snapshot().clone();
    let recomputed = dash.apply(IncidentEvent::Resample);
    assert_eq!(recomputed, Recomputed { sample: true, ..Default::default() });
    let after = dash.snapshot();
    assert_eq!(after.metrics, before.metrics);
    assert_eq!(after.word_cloud, before.word_cloud);
    assert!(after.sample.as_ready().is_some());
  }

  #[test]
  fn degraded_sections_degrade_only_their_panels() {
    let mut data = dataset();
    data.victims = Section::degraded("no such table: Vitimas");
    let dash = dashboard(data);
    let snap = dash.snapshot();

    assert_eq!(snap.metrics.victims, None);
    assert!(matches!(snap.top_peoples, Panel::Degraded { .. }));
    assert!(matches!(snap.age_histogram, Panel::Degraded { .. }));
    assert!(snap.top_violence_types.as_ready().is_some());
    assert!(snap.metrics.incidents > 0);
  }

  #[test]
  fn degraded_tags_keep_the_fact_table_visible() {
    let mut data = dataset();
    data.tags = Section::degraded("no such table: Tipos_Violencia");
    let dash = dashboard(data);
    let snap = dash.snapshot();

    assert_eq!(snap.filter.violence_types, Selection::Any);
    assert!(matches!(snap.top_violence_types, Panel::Degraded { .. }));
    // Incident 5 has no state; everything else survives.
    assert_eq!(snap.metrics.incidents, 5);
    assert_eq!(snap.per_year, [(2019, 2), (2020, 2), (2021, 1)]);
    assert!(snap.word_cloud.as_ready().is_some());
    assert!(snap.sample.as_ready().is_some());
    assert!(snap.top_peoples.as_ready().is_some());
  }

  #[test]
  fn raw_table_selection() {
    let mut data = dataset();
    data.raw_tables = BTreeMap::from([
      (SourceTable::Povos, Section::ready(RawTable {
        name:    "Povos".into(),
        columns: vec!["id".into(), "nome".into()],
        rows:    vec![vec!["1".into(), "Yanomami".into()]],
      })),
      (SourceTable::Fontes, Section::degraded("no such table: Fontes")),
    ]);
    let mut dash = dashboard(data);
    assert_eq!(dash.snapshot().raw.content, Panel::InsufficientData);

    let recomputed = dash.apply(IncidentEvent::RawTable(SourceTable::Povos));
    assert_eq!(recomputed, Recomputed { table: true, ..Default::default() });
    let raw = dash.snapshot().raw.content.as_ready().cloned().unwrap();
    assert_eq!(raw.rows.len(), 1);

    dash.apply(IncidentEvent::RawTable(SourceTable::Fontes));
    assert!(matches!(dash.snapshot().raw.content, Panel::Degraded { .. }));
  }
}
