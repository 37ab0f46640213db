//! Runtime settings: defaults, then an optional TOML file, then `VISTA_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use vista_core::{
  aggregate::{DEFAULT_BINS, DEFAULT_TOP_N},
  dashboard::DashboardSettings,
  words::{DEFAULT_MAX_WORDS, StopWords},
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub inventory_path:   PathBuf,
  pub incidents_path:   PathBuf,
  pub top_n:            usize,
  pub histogram_bins:   usize,
  pub max_words:        usize,
  pub extra_stop_words: Vec<String>,
  /// Where the TUI writes its logs. Unset means no logs while the TUI runs.
  pub log_file:         Option<PathBuf>,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      inventory_path:   PathBuf::from("estoque.csv"),
      incidents_path:   PathBuf::from("violencia.db"),
      top_n:            DEFAULT_TOP_N,
      histogram_bins:   DEFAULT_BINS,
      max_words:        DEFAULT_MAX_WORDS,
      extra_stop_words: Vec::new(),
      log_file:         None,
    }
  }
}

impl Settings {
  /// Layer `file` (if it exists) and the environment over the defaults.
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(
        config::Environment::with_prefix("VISTA")
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("extra_stop_words"),
      )
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  pub fn dashboard(&self) -> DashboardSettings {
    DashboardSettings {
      top_n:          self.top_n.max(1),
      histogram_bins: self.histogram_bins.max(1),
      max_words:      self.max_words.max(1),
      stop_words:     StopWords::with_extra(&self.extra_stop_words),
    }
  }
}
