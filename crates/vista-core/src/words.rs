//! Word frequencies for the description word cloud.

use std::{
  collections::{HashMap, HashSet},
  sync::LazyLock,
};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::InsufficientData;

/// Words kept in a word cloud unless configured otherwise.
pub const DEFAULT_MAX_WORDS: usize = 200;

const BASE_STOP_WORDS: &[&str] = &[
  "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as",
  "at", "be", "because", "been", "before", "being", "but", "by", "can", "could",
  "did", "do", "does", "for", "from", "had", "has", "have", "he", "her", "here",
  "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "me",
  "more", "most", "my", "no", "not", "of", "on", "or", "other", "our", "out",
  "over", "she", "so", "some", "such", "than", "that", "the", "their", "them",
  "then", "there", "these", "they", "this", "those", "to", "too", "under", "up",
  "very", "was", "we", "were", "what", "when", "where", "which", "while", "who",
  "why", "will", "with", "would", "you", "your",
];

/// Portuguese articles, prepositions, conjunctions and temporal filler that
/// dominate incident descriptions without saying anything.
const DOMAIN_STOP_WORDS: &[&str] = &[
  "de", "da", "do", "das", "dos", "e", "o", "os", "as", "um", "uma", "em",
  "no", "na", "nos", "nas", "por", "para", "com", "que", "se", "ao", "aos",
  "à", "às", "pelo", "pela", "foi", "ser", "sua", "seu", "suas", "seus",
  "mais", "como", "mas", "ou", "também", "ano", "anos", "dia", "dias", "mês",
  "após", "durante",
];

/// The set of words dropped before counting.
#[derive(Debug, Clone)]
pub struct StopWords(HashSet<String>);

impl Default for StopWords {
  fn default() -> Self { Self::with_extra(std::iter::empty::<&str>()) }
}

impl StopWords {
  /// Base and domain lists plus `extra` (compared lower-cased).
  pub fn with_extra<S: AsRef<str>>(extra: impl IntoIterator<Item = S>) -> Self {
    let words = BASE_STOP_WORDS
      .iter()
      .chain(DOMAIN_STOP_WORDS)
      .map(|w| w.to_string())
      .chain(extra.into_iter().map(|w| w.as_ref().to_lowercase()))
      .collect();
    Self(words)
  }

  pub fn contains(&self, word: &str) -> bool { self.0.contains(word) }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

/// A word and its prominence in the cloud.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordWeight {
  pub word:   String,
  pub count:  usize,
  /// `count` relative to the most frequent word, in (0, 1].
  pub weight: f64,
}

/// Join the non-missing descriptions and count their words.
///
/// Returns the `max_words` most frequent words, most frequent first. An
/// empty joined text, or one made only of stop words, is insufficient data.
pub fn word_frequencies<'a>(
  descriptions: impl IntoIterator<Item = Option<&'a str>>,
  stop_words: &StopWords,
  max_words: usize,
) -> Result<Vec<WordWeight>, InsufficientData> {
  let text = descriptions.into_iter().flatten().collect::<Vec<_>>().join(" ");
  if text.trim().is_empty() {
    return Err(InsufficientData);
  }

  let mut counts: HashMap<String, usize> = HashMap::new();
  for token in tokens(&text) {
    let word = token.to_lowercase();
    if word.chars().count() < 2
      || word.chars().all(|c| c.is_numeric())
      || stop_words.contains(&word)
    {
      continue;
    }
    *counts.entry(word).or_default() += 1;
  }

  let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
  if ranked.is_empty() {
    return Err(InsufficientData);
  }
  ranked.sort_by(|(wa, ca), (wb, cb)| cb.cmp(ca).then_with(|| wa.cmp(wb)));
  ranked.truncate(max_words);

  let max = ranked[0].1 as f64;
  Ok(
    ranked
      .into_iter()
      .map(|(word, count)| WordWeight { word, count, weight: count as f64 / max })
      .collect(),
  )
}

/// Word characters, with an apostrophe or hyphen allowed between two of
/// them.
static WORD: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\w+(?:['-]\w+)*").expect("word pattern compiles"));

fn tokens(text: &str) -> impl Iterator<Item = &str> {
  WORD.find_iter(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn domain_list_is_complete() {
    assert_eq!(DOMAIN_STOP_WORDS.len(), 45);
    let stop = StopWords::default();
    for word in ["de", "durante", "após", "the", "também"] {
      assert!(stop.contains(word), "{word} should be a stop word");
    }
  }

  #[test]
  fn extra_stop_words_are_lowercased() {
    let stop = StopWords::with_extra(["Indígena", "ALDEIA"]);
    assert!(stop.contains("indígena"));
    assert!(stop.contains("aldeia"));
    assert!(stop.len() > StopWords::default().len());
  }

  #[test]
  fn empty_text_is_insufficient() {
    let stop = StopWords::default();
    assert_eq!(word_frequencies([], &stop, 200), Err(InsufficientData));
    assert_eq!(word_frequencies([None, None], &stop, 200), Err(InsufficientData));
    assert_eq!(word_frequencies([Some("  "), None], &stop, 200), Err(InsufficientData));
  }

  #[test]
  fn only_stop_words_is_insufficient() {
    let stop = StopWords::default();
    let result = word_frequencies([Some("de da do e o"), Some("a 2021")], &stop, 200);
    assert_eq!(result, Err(InsufficientData));
  }

  #[test]
  fn counts_words_across_descriptions() {
    let stop = StopWords::default();
    let words = word_frequencies(
      [
        Some("Ameaça de morte contra liderança"),
        None,
        Some("Nova ameaça à liderança durante a retomada"),
        Some("ameaça"),
      ],
      &stop,
      200,
    )
    .unwrap();

    assert_eq!(words[0].word, "ameaça");
    assert_eq!(words[0].count, 3);
    assert_eq!(words[0].weight, 1.0);
    assert_eq!(words[1].word, "liderança");
    assert_eq!(words[1].count, 2);
    assert!((words[1].weight - 2.0 / 3.0).abs() < 1e-9);
    assert!(words.iter().all(|w| !stop.contains(&w.word)));
  }

  #[test]
  fn max_words_truncates() {
    let stop = StopWords::default();
    let words = word_frequencies([Some("alfa beta gama delta alfa")], &stop, 2).unwrap();
    assert_eq!(words.len(), 2);
    assert_eq!(words[0].word, "alfa");
    // Ties broken alphabetically.
    assert_eq!(words[1].word, "beta");
  }

  #[test]
  fn tokens_keep_inner_joiners() {
    let found: Vec<&str> = tokens("guarani-kaiowá, d'água -x 12 a--b").collect();
    assert_eq!(found, ["guarani-kaiowá", "d'água", "x", "12", "a", "b"]);
  }
}
