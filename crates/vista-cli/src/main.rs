//! `vista`: terminal dashboards for a stock file and an incident database.
//!
//! # Usage
//!
//! ```text
//! vista inventory --file estoque.csv
//! vista incidents --db violencia.db
//! vista --headless incidents --year 2020 --state MS
//! ```

mod app;
mod settings;
mod ui;

use std::{
  fs::OpenOptions,
  io,
  path::PathBuf,
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context as _, Result};
use app::App;
use clap::{Parser, Subcommand};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use vista_core::{
  dashboard::{IncidentEvent, InventoryEvent},
  filter::Selection,
  inventory::CategoryChoice,
  session::SessionStore,
};
use vista_csv::CsvInventory;
use vista_store_sqlite::SqliteIncidents;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "vista", version, about = "Terminal dashboards for stock and incident data")]
struct Args {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "vista.toml", value_name = "FILE")]
  config: PathBuf,

  /// Print the dashboard snapshot as JSON instead of opening the TUI.
  #[arg(long, global = true)]
  headless: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Stock chart and table over a CSV file.
  Inventory {
    /// CSV file with product, category, quantity and value columns.
    #[arg(long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Headless only: include the table.
    #[arg(long)]
    show_table: bool,

    /// Headless only: table category ("Todas" for every row).
    #[arg(long)]
    table_category: Option<String>,

    /// Headless only: number of table rows.
    #[arg(long)]
    rows: Option<usize>,

    /// Headless only: category shown in the chart.
    #[arg(long)]
    chart_category: Option<String>,
  },

  /// Filters, charts, word cloud and narratives over an incident database.
  Incidents {
    /// SQLite database file.
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,

    /// Headless only: keep these years (repeatable).
    #[arg(long = "year")]
    years: Vec<i32>,

    /// Headless only: keep these state codes (repeatable).
    #[arg(long = "state")]
    states: Vec<String>,

    /// Headless only: keep these violence types (repeatable).
    #[arg(long = "violence-type")]
    violence_types: Vec<String>,

    /// Headless only: show this raw table in the explorer.
    #[arg(long)]
    raw_table: Option<vista_core::incident::SourceTable>,
  },
}

// ─── Logging ──────────────────────────────────────────────────────────────────

/// Headless runs log to stderr. The TUI owns the terminal, so it logs to
/// `log_file` or not at all.
fn init_tracing(headless: bool, log_file: Option<&PathBuf>) -> Result<()> {
  let filter = || {
    EnvFilter::builder()
      .with_default_directive(LevelFilter::INFO.into())
      .from_env_lossy()
  };

  if headless {
    tracing_subscriber::fmt()
      .with_env_filter(filter())
      .with_writer(io::stderr)
      .init();
  } else if let Some(path) = log_file {
    let file = OpenOptions::new()
      .create(true)
      .append(true)
      .open(path)
      .with_context(|| format!("failed to open log file {}", path.display()))?;
    tracing_subscriber::fmt()
      .with_env_filter(filter())
      .with_ansi(false)
      .with_writer(Mutex::new(file))
      .init();
  }
  Ok(())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let mut settings = Settings::load(&args.config)?;
  match &args.command {
    Command::Inventory { file: Some(file), .. } => settings.inventory_path = file.clone(),
    Command::Incidents { db: Some(db), .. } => settings.incidents_path = db.clone(),
    _ => {}
  }

  init_tracing(args.headless, settings.log_file.as_ref())?;

  let mut sessions = SessionStore::default();
  let id = sessions.begin();
  let session = sessions
    .get_mut(id)
    .context("session vanished right after it began")?;

  // Load before touching the terminal so a missing source is reported plainly.
  match args.command {
    Command::Inventory { show_table, table_category, rows, chart_category, .. } => {
      let source = CsvInventory::new(&settings.inventory_path);
      let dashboard = session
        .inventory_dashboard(&source)
        .await
        .with_context(|| format!("cannot open stock file {}", settings.inventory_path.display()))?;

      if args.headless {
        dashboard.apply(InventoryEvent::ShowTable(show_table));
        if let Some(category) = table_category {
          let choice = if category == CategoryChoice::All.label() {
            CategoryChoice::All
          } else {
            CategoryChoice::Only(category)
          };
          dashboard.apply(InventoryEvent::TableCategory(choice));
        }
        if let Some(rows) = rows {
          dashboard.apply(InventoryEvent::RowLimit(rows));
        }
        if let Some(category) = chart_category {
          dashboard.apply(InventoryEvent::ChartCategory(category));
        }
        print_json(dashboard.snapshot())
      } else {
        run_tui(App::inventory(dashboard)).await
      }
    }
    Command::Incidents { years, states, violence_types, raw_table, .. } => {
      let source = SqliteIncidents::new(&settings.incidents_path);
      let dashboard = session
        .incident_dashboard(&source, settings.dashboard())
        .await
        .with_context(|| {
          format!("cannot open incident database {}", settings.incidents_path.display())
        })?;

      if args.headless {
        if !years.is_empty() {
          dashboard.apply(IncidentEvent::Years(Selection::only(years)));
        }
        if !states.is_empty() {
          dashboard.apply(IncidentEvent::States(Selection::only(states)));
        }
        if !violence_types.is_empty() {
          dashboard.apply(IncidentEvent::ViolenceTypes(Selection::only(violence_types)));
        }
        if let Some(table) = raw_table {
          dashboard.apply(IncidentEvent::RawTable(table));
        }
        print_json(dashboard.snapshot())
      } else {
        run_tui(App::incidents(dashboard)).await
      }
    }
  }
}

fn print_json(snapshot: &impl serde::Serialize) -> Result<()> {
  let json = serde_json::to_string_pretty(snapshot).context("failed to serialise snapshot")?;
  println!("{json}");
  Ok(())
}

// ─── Terminal ─────────────────────────────────────────────────────────────────

async fn run_tui(mut app: App<'_>) -> Result<()> {
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<'_>,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && key.kind == event::KeyEventKind::Press
      && !app.handle_key(key)
    {
      break;
    }
  }

  Ok(())
}
