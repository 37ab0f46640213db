//! Aggregations over filtered views: counts, group-counts, top-N rankings and
//! histograms. All results are owned and ready for a renderer.

use std::{
  collections::{BTreeMap, HashSet},
  hash::Hash,
};

use serde::{Deserialize, Serialize};

use crate::InsufficientData;

/// Number of entries kept by [`top_n`] on the dashboards.
pub const DEFAULT_TOP_N: usize = 10;

/// Number of histogram bins on the dashboards.
pub const DEFAULT_BINS: usize = 20;

// ─── Counts ──────────────────────────────────────────────────────────────────

/// Number of distinct non-missing values.
pub fn distinct_count<K: Eq + Hash>(values: impl IntoIterator<Item = Option<K>>) -> usize {
  values.into_iter().flatten().collect::<HashSet<K>>().len()
}

/// Partition by key and count each partition, ordered by key.
pub fn group_count<K: Ord>(keys: impl IntoIterator<Item = K>) -> Vec<(K, usize)> {
  let mut counts: BTreeMap<K, usize> = BTreeMap::new();
  for key in keys {
    *counts.entry(key).or_default() += 1;
  }
  counts.into_iter().collect()
}

/// The `n` most frequent keys, listed smallest count first.
///
/// Ranked descending by count (ties by key) and truncated, then re-sorted
/// ascending so a horizontal bar chart draws the largest bar on top.
/// Missing keys are skipped.
pub fn top_n<K: Ord>(keys: impl IntoIterator<Item = Option<K>>, n: usize) -> Vec<(K, usize)> {
  let mut ranked = group_count(keys.into_iter().flatten());
  ranked.sort_by(|(_, a), (_, b)| b.cmp(a));
  ranked.truncate(n);
  ranked.sort_by_key(|(_, count)| *count);
  ranked
}

// ─── Histogram ───────────────────────────────────────────────────────────────

/// One equal-width bin. `lower` is exclusive except for the first bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bin {
  pub lower: f64,
  pub upper: f64,
  pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
  pub bins: Vec<Bin>,
}

impl Histogram {
  pub fn total(&self) -> usize { self.bins.iter().map(|b| b.count).sum() }
}

/// Bucket the non-missing values into `bin_count` equal-width bins spanning
/// their range.
pub fn histogram(
  values: impl IntoIterator<Item = Option<f64>>,
  bin_count: usize,
) -> Result<Histogram, InsufficientData> {
  let values: Vec<f64> = values
    .into_iter()
    .flatten()
    .filter(|v| v.is_finite())
    .collect();
  if values.is_empty() || bin_count == 0 {
    return Err(InsufficientData);
  }

  let (mut start, mut end) = values
    .iter()
    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
  if start == end {
    start -= 0.5;
    end += 0.5;
  }

  let interval = (end - start) / bin_count as f64;
  let mut bins: Vec<Bin> = (0..bin_count)
    .map(|b| Bin {
      lower: start + b as f64 * interval,
      upper: if b + 1 == bin_count { end } else { start + (b + 1) as f64 * interval },
      count: 0,
    })
    .collect();

  let last = bin_count - 1;
  for v in values {
    // Right-closed bins; the minimum lands in the first one.
    let idx = (((v - start) / interval).ceil() as usize).saturating_sub(1).min(last);
    bins[idx].count += 1;
  }

  Ok(Histogram { bins })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn distinct_count_ignores_missing() {
    let values = [Some("a"), None, Some("b"), Some("a"), None];
    assert_eq!(distinct_count(values), 2);
    assert_eq!(distinct_count::<&str>([None, None]), 0);
  }

  #[test]
  fn group_count_orders_by_key() {
    let years = [2021, 2019, 2021, 2020, 2019, 2021];
    assert_eq!(group_count(years), [(2019, 2), (2020, 1), (2021, 3)]);
  }

  #[test]
  fn top_ten_of_eleven_listed_ascending() {
    let counts = [
      ("A", 5),
      ("B", 12),
      ("C", 3),
      ("D", 9),
      ("E", 7),
      ("F", 11),
      ("G", 2),
      ("H", 8),
      ("I", 4),
      ("J", 6),
      ("K", 1),
    ];
    let keys = counts
      .iter()
      .flat_map(|(k, n)| std::iter::repeat_n(Some(*k), *n));

    let top = top_n(keys, 10);
    assert_eq!(top.len(), 10);
    // K (1) is the one that falls off; G (2) is the smallest kept, B (12) last.
    assert_eq!(top.first(), Some(&("G", 2)));
    assert_eq!(top.last(), Some(&("B", 12)));
    assert!(top.windows(2).all(|w| w[0].1 <= w[1].1));
    assert!(top.iter().all(|(k, _)| *k != "K"));
  }

  #[test]
  fn top_n_with_fewer_keys_keeps_all() {
    let top = top_n([Some("x"), Some("y"), Some("x"), None], 10);
    assert_eq!(top, [("y", 1), ("x", 2)]);
  }

  #[test]
  fn histogram_excludes_missing_values() {
    let ages = [Some(10.0), None, Some(20.0), Some(30.0), None, Some(40.0)];
    let hist = histogram(ages, 3).unwrap();
    assert_eq!(hist.bins.len(), 3);
    assert_eq!(hist.total(), 4);
    assert_eq!(hist.bins[0].lower, 10.0);
    assert_eq!(hist.bins[2].upper, 40.0);
    assert_eq!(hist.bins.iter().map(|b| b.count).collect::<Vec<_>>(), [2, 1, 1]);
  }

  #[test]
  fn histogram_has_requested_bin_count() {
    let ages = (0..100).map(|a| Some(a as f64));
    let hist = histogram(ages, DEFAULT_BINS).unwrap();
    assert_eq!(hist.bins.len(), DEFAULT_BINS);
    assert_eq!(hist.total(), 100);
  }

  #[test]
  fn histogram_of_single_value_widens_range() {
    let hist = histogram([Some(7.0), Some(7.0)], 4).unwrap();
    assert_eq!(hist.bins[0].lower, 6.5);
    assert_eq!(hist.bins[3].upper, 7.5);
    assert_eq!(hist.total(), 2);
  }

  #[test]
  fn histogram_without_values_is_insufficient() {
    assert_eq!(histogram([None, None], 20), Err(InsufficientData));
    assert_eq!(histogram(std::iter::empty(), 20), Err(InsufficientData));
  }
}
