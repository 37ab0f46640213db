//! The narrative sample: one random description, held across updates.

use rand::{Rng, seq::SliceRandom as _};
use serde::{Deserialize, Serialize};

use crate::{InsufficientData, filter::IncidentView};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeSample {
  pub incident_id: i64,
  pub text:        String,
}

/// Session-scoped holder for the current sample.
///
/// The held description survives every update whose view still contains its
/// incident. It is redrawn when that incident is filtered out, or on
/// [`SampleState::reroll`].
#[derive(Debug, Clone, Default)]
pub struct SampleState {
  held: Option<NarrativeSample>,
}

impl SampleState {
  pub fn current(&self) -> Option<&NarrativeSample> { self.held.as_ref() }

  /// Keep the held sample if `view` still contains it, otherwise draw a new
  /// one. Returns whether a new sample was drawn.
  pub fn refresh<R: Rng + ?Sized>(
    &mut self,
    view: &IncidentView<'_>,
    rng: &mut R,
  ) -> Result<bool, InsufficientData> {
    if let Some(held) = &self.held
      && view.contains_incident(held.incident_id)
    {
      return Ok(false);
    }
    self.draw(view, rng).map(|()| true)
  }

  /// Draw a new sample regardless of the held one.
  pub fn reroll<R: Rng + ?Sized>(
    &mut self,
    view: &IncidentView<'_>,
    rng: &mut R,
  ) -> Result<(), InsufficientData> {
    self.draw(view, rng)
  }

  fn draw<R: Rng + ?Sized>(
    &mut self,
    view: &IncidentView<'_>,
    rng: &mut R,
  ) -> Result<(), InsufficientData> {
    let candidates: Vec<NarrativeSample> = view
      .incidents
      .iter()
      .filter_map(|i| {
        i.narrative().map(|text| NarrativeSample {
          incident_id: i.id,
          text:        text.to_owned(),
        })
      })
      .collect();

    self.held = candidates.choose(rng).cloned();
    self.held.as_ref().map(|_| ()).ok_or(InsufficientData)
  }
}

#[cfg(test)]
mod tests {
  use rand::{SeedableRng as _, rngs::StdRng};

  use super::*;
  use crate::filter::{IncidentFilter, Selection, compose, tests::dataset};

  #[test]
  fn held_sample_survives_unchanged_filters() {
    let data = dataset();
    let filter = IncidentFilter::default();
    let mut rng = StdRng::seed_from_u64(7);
    let mut state = SampleState::default();

    assert_eq!(state.refresh(&compose(&data, &filter), &mut rng), Ok(true));
    let first = state.current().cloned().unwrap();

    for _ in 0..20 {
      assert_eq!(state.refresh(&compose(&data, &filter), &mut rng), Ok(false));
      assert_eq!(state.current(), Some(&first));
    }
  }

  #[test]
  fn filtering_out_the_held_incident_draws_again() {
    let data = dataset();
    let mut rng = StdRng::seed_from_u64(11);
    let mut state = SampleState::default();
    state.refresh(&compose(&data, &IncidentFilter::default()), &mut rng).unwrap();
    let held = state.current().unwrap().incident_id;
    let held_year = data.incidents.iter().find(|i| i.id == held).unwrap().year;

    let other_years: Vec<i32> = [2019, 2020, 2021].into_iter().filter(|y| *y != held_year).collect();
    let filter = IncidentFilter { years: Selection::only(other_years), ..Default::default() };
    let view = compose(&data, &filter);

    assert_eq!(state.refresh(&view, &mut rng), Ok(true));
    let redrawn = state.current().unwrap();
    assert_ne!(redrawn.incident_id, held);
    assert!(view.contains_incident(redrawn.incident_id));
  }

  #[test]
  fn changed_filter_keeping_the_incident_keeps_the_sample() {
    let data = dataset();
    let mut rng = StdRng::seed_from_u64(3);
    let mut state = SampleState::default();
    state.refresh(&compose(&data, &IncidentFilter::default()), &mut rng).unwrap();
    let held = state.current().cloned().unwrap();
    let held_year = data.incidents.iter().find(|i| i.id == held.incident_id).unwrap().year;

    let filter = IncidentFilter { years: Selection::only([held_year]), ..Default::default() };
    assert_eq!(state.refresh(&compose(&data, &filter), &mut rng), Ok(false));
    assert_eq!(state.current(), Some(&held));
  }

  #[test]
  fn incidents_without_description_are_never_sampled() {
    let data = dataset();
    let mut rng = StdRng::seed_from_u64(5);
    let mut state = SampleState::default();
    // 2020 holds incident 3 (no description) and 4.
    let view = compose(&data, &IncidentFilter {
      years: Selection::only([2020]),
      ..Default::default()
    });
    for _ in 0..10 {
      state.reroll(&view, &mut rng).unwrap();
      assert_eq!(state.current().unwrap().incident_id, 4);
    }
  }

  #[test]
  fn empty_view_is_insufficient_and_clears() {
    let data = dataset();
    let mut rng = StdRng::seed_from_u64(1);
    let mut state = SampleState::default();
    state.refresh(&compose(&data, &IncidentFilter::default()), &mut rng).unwrap();

    let empty = compose(&data, &IncidentFilter { years: Selection::none(), ..Default::default() });
    assert_eq!(state.refresh(&empty, &mut rng), Err(InsufficientData));
    assert_eq!(state.current(), None);
  }
}
