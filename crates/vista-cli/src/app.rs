//! Application state machine and key dispatcher.
//!
//! Keys never touch a dashboard directly: each screen turns a key into an
//! [`Action`], and only [`App::handle_key`] applies the resulting event.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use strum::{Display, EnumIter, IntoEnumIterator};
use vista_core::{
  dashboard::{IncidentDashboard, IncidentEvent, InventoryDashboard, InventoryEvent, Recomputed},
  filter::Selection,
};

// ─── Actions ──────────────────────────────────────────────────────────────────

/// What a key press means for the current screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Action<E> {
  Quit,
  /// Send an event to the dashboard.
  Apply(E),
  /// UI-only change (focus, cursor, tab, scroll); the state is already updated.
  Moved,
  Ignored,
}

/// Step through all variants of `T`, wrapping at both ends.
fn cycle<T: IntoEnumIterator + PartialEq + Copy>(current: T, forward: bool) -> T {
  let all: Vec<T> = T::iter().collect();
  let at = all.iter().position(|v| *v == current).unwrap_or(0);
  let next = if forward { (at + 1) % all.len() } else { (at + all.len() - 1) % all.len() };
  all[next]
}

/// Step through `items` from the one equal to `current`, wrapping around.
fn step<'i, T: PartialEq>(items: &'i [T], current: Option<&T>, forward: bool) -> Option<&'i T> {
  if items.is_empty() {
    return None;
  }
  let len = items.len();
  let next = match current.and_then(|c| items.iter().position(|i| i == c)) {
    Some(at) if forward => (at + 1) % len,
    Some(at) => (at + len - 1) % len,
    None => 0,
  };
  items.get(next)
}

// ─── Inventory screen ─────────────────────────────────────────────────────────

/// Sidebar controls of the inventory dashboard, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum InventoryControl {
  #[strum(serialize = "Exibir tabela")]
  ShowTable,
  #[strum(serialize = "Categoria da tabela")]
  TableCategory,
  #[strum(serialize = "Linhas")]
  RowLimit,
  #[strum(serialize = "Categoria do gráfico")]
  ChartCategory,
}

pub struct InventoryScreen<'a> {
  pub dashboard: &'a mut InventoryDashboard,
  pub focus:     InventoryControl,
}

impl<'a> InventoryScreen<'a> {
  pub fn new(dashboard: &'a mut InventoryDashboard) -> Self {
    Self { dashboard, focus: InventoryControl::ShowTable }
  }

  pub fn action(&mut self, key: KeyEvent) -> Action<InventoryEvent> {
    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
      KeyCode::Up | KeyCode::Char('k') => {
        self.focus = cycle(self.focus, false);
        Action::Moved
      }
      KeyCode::Down | KeyCode::Char('j') => {
        self.focus = cycle(self.focus, true);
        Action::Moved
      }
      KeyCode::Left | KeyCode::Char('h') => self.adjust(false, 1),
      KeyCode::Right | KeyCode::Char('l') => self.adjust(true, 1),
      KeyCode::PageDown => self.adjust(false, 10),
      KeyCode::PageUp => self.adjust(true, 10),
      KeyCode::Char(' ') | KeyCode::Enter if self.focus == InventoryControl::ShowTable => {
        Action::Apply(InventoryEvent::ShowTable(!self.dashboard.show_table()))
      }
      _ => Action::Ignored,
    }
  }

  /// Move the focused control one option (or `by` rows) forward or back.
  fn adjust(&self, forward: bool, by: usize) -> Action<InventoryEvent> {
    let dash = &*self.dashboard;
    let snapshot = dash.snapshot();
    let event = match self.focus {
      InventoryControl::ShowTable => Some(InventoryEvent::ShowTable(!dash.show_table())),
      InventoryControl::TableCategory => {
        step(&snapshot.table_choices, Some(dash.table_category()), forward)
          .cloned()
          .map(InventoryEvent::TableCategory)
      }
      InventoryControl::RowLimit => snapshot.table.as_ref().map(|table| {
        let limit = if forward {
          table.row_limit.saturating_add(by).min(table.max_rows)
        } else {
          table.row_limit.saturating_sub(by).max(1)
        };
        InventoryEvent::RowLimit(limit)
      }),
      InventoryControl::ChartCategory => {
        let current = dash.chart_category().map(str::to_owned);
        step(&snapshot.categories, current.as_ref(), forward)
          .cloned()
          .map(InventoryEvent::ChartCategory)
      }
    };
    event.map_or(Action::Ignored, Action::Apply)
  }
}

// ─── Incident screen ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Tab {
  #[strum(serialize = "Visão geral")]
  Overview,
  #[strum(serialize = "Narrativa")]
  Narrative,
  #[strum(serialize = "Nuvem de palavras")]
  WordCloud,
  #[strum(serialize = "Gráficos")]
  Charts,
  #[strum(serialize = "Tabelas")]
  RawTables,
}

/// The multi-select filter lists in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum FilterList {
  #[strum(serialize = "Ano")]
  Years,
  #[strum(serialize = "UF")]
  States,
  #[strum(serialize = "Tipo de violência")]
  ViolenceTypes,
}

pub struct IncidentScreen<'a> {
  pub dashboard:  &'a mut IncidentDashboard,
  pub tab:        Tab,
  pub focus:      FilterList,
  /// Cursor per filter list, indexed by [`FilterList`] position.
  cursors:        [usize; 3],
  /// First visible row of the raw table.
  pub raw_scroll: usize,
}

impl<'a> IncidentScreen<'a> {
  pub fn new(dashboard: &'a mut IncidentDashboard) -> Self {
    Self {
      dashboard,
      tab: Tab::Overview,
      focus: FilterList::Years,
      cursors: [0; 3],
      raw_scroll: 0,
    }
  }

  pub fn cursor(&self, list: FilterList) -> usize { self.cursors[list as usize] }

  /// Option labels of `list`, in display order.
  pub fn option_labels(&self, list: FilterList) -> Vec<String> {
    let options = self.dashboard.options();
    match list {
      FilterList::Years => options.years.iter().map(i32::to_string).collect(),
      FilterList::States => options.states.clone(),
      FilterList::ViolenceTypes => options.violence_types.clone(),
    }
  }

  /// Whether option `index` of `list` is currently selected.
  pub fn is_checked(&self, list: FilterList, index: usize) -> bool {
    let options = self.dashboard.options();
    let filter = self.dashboard.filter();
    match list {
      FilterList::Years => options.years.get(index).is_some_and(|y| filter.years.contains(y)),
      FilterList::States => options
        .states
        .get(index)
        .is_some_and(|s| filter.states.contains(s.as_str())),
      FilterList::ViolenceTypes => options
        .violence_types
        .get(index)
        .is_some_and(|t| filter.violence_types.contains(t.as_str())),
    }
  }

  pub fn action(&mut self, key: KeyEvent) -> Action<IncidentEvent> {
    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
      KeyCode::Tab => {
        self.tab = cycle(self.tab, true);
        Action::Moved
      }
      KeyCode::BackTab => {
        self.tab = cycle(self.tab, false);
        Action::Moved
      }
      KeyCode::Left | KeyCode::Char('h') => {
        self.focus = cycle(self.focus, false);
        Action::Moved
      }
      KeyCode::Right | KeyCode::Char('l') => {
        self.focus = cycle(self.focus, true);
        Action::Moved
      }
      KeyCode::Up | KeyCode::Char('k') => self.move_cursor(false),
      KeyCode::Down | KeyCode::Char('j') => self.move_cursor(true),
      KeyCode::PageUp => {
        self.raw_scroll = self.raw_scroll.saturating_sub(10);
        Action::Moved
      }
      KeyCode::PageDown => {
        self.raw_scroll = self.raw_scroll.saturating_add(10);
        Action::Moved
      }
      KeyCode::Char(' ') => self.toggle_under_cursor(),
      KeyCode::Char('a') => Action::Apply(self.select_all(true)),
      KeyCode::Char('n') => Action::Apply(self.select_all(false)),
      KeyCode::Char('r') => Action::Apply(IncidentEvent::Resample),
      KeyCode::Char('[') => self.switch_raw_table(false),
      KeyCode::Char(']') => self.switch_raw_table(true),
      _ => Action::Ignored,
    }
  }

  fn move_cursor(&mut self, forward: bool) -> Action<IncidentEvent> {
    let len = self.option_labels(self.focus).len();
    let cursor = &mut self.cursors[self.focus as usize];
    *cursor = if forward {
      (*cursor + 1).min(len.saturating_sub(1))
    } else {
      cursor.saturating_sub(1)
    };
    Action::Moved
  }

  /// Select every option of the focused list, or none of them.
  fn select_all(&self, all: bool) -> IncidentEvent {
    fn pick<T: Ord + Clone>(all: bool, options: &[T]) -> Selection<T> {
      if all { Selection::every(options.iter().cloned()) } else { Selection::none() }
    }
    let options = self.dashboard.options();
    match self.focus {
      FilterList::Years => IncidentEvent::Years(pick(all, &options.years)),
      FilterList::States => IncidentEvent::States(pick(all, &options.states)),
      FilterList::ViolenceTypes => {
        IncidentEvent::ViolenceTypes(pick(all, &options.violence_types))
      }
    }
  }

  fn toggle_under_cursor(&self) -> Action<IncidentEvent> {
    let options = self.dashboard.options();
    let filter = self.dashboard.filter();
    let at = self.cursor(self.focus);
    let event = match self.focus {
      FilterList::Years => options.years.get(at).map(|year| {
        let mut years = filter.years.clone();
        years.toggle(*year, &options.years);
        IncidentEvent::Years(years)
      }),
      FilterList::States => options.states.get(at).map(|state| {
        let mut states = filter.states.clone();
        states.toggle(state.clone(), &options.states);
        IncidentEvent::States(states)
      }),
      FilterList::ViolenceTypes => options.violence_types.get(at).map(|kind| {
        let mut types = filter.violence_types.clone();
        types.toggle(kind.clone(), &options.violence_types);
        IncidentEvent::ViolenceTypes(types)
      }),
    };
    event.map_or(Action::Ignored, Action::Apply)
  }

  fn switch_raw_table(&self, forward: bool) -> Action<IncidentEvent> {
    let table = cycle(self.dashboard.snapshot().raw.table, forward);
    Action::Apply(IncidentEvent::RawTable(table))
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

pub enum Screen<'a> {
  Inventory(InventoryScreen<'a>),
  Incidents(IncidentScreen<'a>),
}

/// Top-level application state.
pub struct App<'a> {
  pub screen:     Screen<'a>,
  /// One-line status message shown in the status bar.
  pub status_msg: String,
}

impl<'a> App<'a> {
  pub fn inventory(dashboard: &'a mut InventoryDashboard) -> Self {
    Self { screen: Screen::Inventory(InventoryScreen::new(dashboard)), status_msg: String::new() }
  }

  pub fn incidents(dashboard: &'a mut IncidentDashboard) -> Self {
    Self { screen: Screen::Incidents(IncidentScreen::new(dashboard)), status_msg: String::new() }
  }

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    let recomputed = match &mut self.screen {
      Screen::Inventory(screen) => match screen.action(key) {
        Action::Quit => return false,
        Action::Apply(event) => Some(screen.dashboard.apply(event)),
        Action::Moved | Action::Ignored => None,
      },
      Screen::Incidents(screen) => match screen.action(key) {
        Action::Quit => return false,
        Action::Apply(event) => {
          if matches!(event, IncidentEvent::RawTable(_)) {
            screen.raw_scroll = 0;
          }
          Some(screen.dashboard.apply(event))
        }
        Action::Moved | Action::Ignored => None,
      },
    };

    if let Some(recomputed) = recomputed {
      self.status_msg = describe(recomputed);
    }
    true
  }
}

fn describe(recomputed: Recomputed) -> String {
  let mut parts = Vec::new();
  if recomputed.aggregates {
    parts.push("filtros aplicados");
  }
  if recomputed.sample {
    parts.push("nova amostra");
  }
  if recomputed.table {
    parts.push("tabela atualizada");
  }
  if recomputed.chart {
    parts.push("gráfico atualizado");
  }
  parts.join(", ")
}
