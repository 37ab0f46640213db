//! Inventory dashboard: a per-category stock chart and an optional table.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::Recomputed;
use crate::inventory::{CategoryChoice, InventoryRow, categories, filter_rows, table_choices};

// ─── Events ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum InventoryEvent {
  /// The "show data table" checkbox.
  ShowTable(bool),
  TableCategory(CategoryChoice),
  /// The row-count slider; clamped to the filtered row count.
  RowLimit(usize),
  ChartCategory(String),
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
  pub product:  String,
  pub category: String,
  pub quantity: i64,
  /// Currency-formatted value.
  pub value:    String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSection {
  pub category:  CategoryChoice,
  pub row_limit: usize,
  /// Rows matching `category`; the upper bound of the row slider.
  pub max_rows:  usize,
  pub rows:      Vec<TableRow>,
}

/// Quantities per product in one category, in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockChart {
  pub category: String,
  pub title:    String,
  pub bars:     Vec<(String, i64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
  pub categories:    Vec<String>,
  pub table_choices: Vec<CategoryChoice>,
  /// `None` while the table is hidden.
  pub table:         Option<TableSection>,
  /// `None` when the file has no categories to chart.
  pub chart:         Option<StockChart>,
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

pub struct InventoryDashboard {
  rows:           Arc<Vec<InventoryRow>>,
  show_table:     bool,
  table_category: CategoryChoice,
  row_limit:      usize,
  chart_category: Option<String>,
  snapshot:       InventorySnapshot,
}

impl InventoryDashboard {
  /// Start with the table hidden, the first option of each select chosen and
  /// the row slider at its minimum.
  pub fn new(rows: Arc<Vec<InventoryRow>>) -> Self {
    let categories = categories(&rows);
    let table_choices = table_choices(&rows);
    let table_category = table_choices.first().cloned().unwrap_or(CategoryChoice::All);
    let chart_category = categories.first().cloned();

    let mut dashboard = Self {
      rows,
      show_table: false,
      table_category,
      row_limit: 1,
      chart_category,
      snapshot: InventorySnapshot { categories, table_choices, table: None, chart: None },
    };
    dashboard.recompute_table();
    dashboard.recompute_chart();
    dashboard
  }

  pub fn snapshot(&self) -> &InventorySnapshot { &self.snapshot }

  pub fn rows(&self) -> &[InventoryRow] { &self.rows }

  pub fn show_table(&self) -> bool { self.show_table }

  /// The table's category select, kept while the table is hidden.
  pub fn table_category(&self) -> &CategoryChoice { &self.table_category }

  pub fn row_limit(&self) -> usize { self.row_limit }

  pub fn chart_category(&self) -> Option<&str> { self.chart_category.as_deref() }

  pub fn apply(&mut self, event: InventoryEvent) -> Recomputed {
    tracing::debug!(?event, "inventory event");
    match event {
      InventoryEvent::ShowTable(show) => self.show_table = show,
      InventoryEvent::TableCategory(choice) => self.table_category = choice,
      InventoryEvent::RowLimit(limit) => self.row_limit = limit,
      InventoryEvent::ChartCategory(category) => {
        self.chart_category = Some(category);
        self.recompute_chart();
        return Recomputed { chart: true, ..Default::default() };
      }
    }
    self.recompute_table();
    Recomputed { table: true, ..Default::default() }
  }

  fn recompute_table(&mut self) {
    if !self.show_table {
      self.snapshot.table = None;
      return;
    }

    let filtered = filter_rows(&self.rows, &self.table_category);
    let max_rows = filtered.len();
    self.row_limit = if max_rows == 0 { 0 } else { self.row_limit.clamp(1, max_rows) };

    let rows = filtered
      .into_iter()
      .take(self.row_limit)
      .map(|r| TableRow {
        product:  r.product.clone(),
        category: r.category.clone(),
        quantity: r.quantity,
        value:    r.formatted_value(),
      })
      .collect();

    self.snapshot.table = Some(TableSection {
      category: self.table_category.clone(),
      row_limit: self.row_limit,
      max_rows,
      rows,
    });
  }

  fn recompute_chart(&mut self) {
    self.snapshot.chart = self.chart_category.as_ref().map(|category| {
      let choice = CategoryChoice::Only(category.clone());
      StockChart {
        category: category.clone(),
        title:    format!("Estoque de Produtos na Categoria: {category}"),
        bars:     filter_rows(&self.rows, &choice)
          .into_iter()
          .map(|r| (r.product.clone(), r.quantity))
          .collect(),
      }
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn rows() -> Arc<Vec<InventoryRow>> {
    let row = |product: &str, category: &str, quantity: i64, value: f64| InventoryRow {
      product: product.into(),
      category: category.into(),
      quantity,
      value,
    };
    Arc::new(vec![
      row("Arroz", "Grãos", 40, 220.0),
      row("Leite", "Laticínios", 25, 112.5),
      row("Feijão", "Grãos", 30, 249.9),
      row("Queijo", "Laticínios", 8, 320.0),
      row("Milho", "Grãos", 12, 60.0),
    ])
  }

  #[test]
  fn starts_with_first_category_charted_and_table_hidden() {
    let dash = InventoryDashboard::new(rows());
    let snap = dash.snapshot();
    assert_eq!(snap.categories, ["Grãos", "Laticínios"]);
    assert!(snap.table.is_none());

    let chart = snap.chart.as_ref().unwrap();
    assert_eq!(chart.category, "Grãos");
    assert_eq!(chart.title, "Estoque de Produtos na Categoria: Grãos");
    assert_eq!(chart.bars, [
      ("Arroz".to_string(), 40),
      ("Feijão".to_string(), 30),
      ("Milho".to_string(), 12),
    ]);
  }

  #[test]
  fn chart_event_only_touches_chart() {
    let mut dash = InventoryDashboard::new(rows());
    let recomputed = dash.apply(InventoryEvent::ChartCategory("Laticínios".into()));
    assert_eq!(recomputed, Recomputed { chart: true, ..Default::default() });
    assert_eq!(dash.snapshot().chart.as_ref().unwrap().bars.len(), 2);
    assert!(dash.snapshot().table.is_none());
  }

  #[test]
  fn table_shows_limited_formatted_rows() {
    let mut dash = InventoryDashboard::new(rows());
    dash.apply(InventoryEvent::ShowTable(true));
    let table = dash.snapshot().table.clone().unwrap();
    assert_eq!(table.category, CategoryChoice::Only("Grãos".into()));
    assert_eq!(table.max_rows, 3);
    assert_eq!(table.row_limit, 1);
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].value, "R$ 220.00");

    dash.apply(InventoryEvent::RowLimit(2));
    let table = dash.snapshot().table.clone().unwrap();
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[1].product, "Feijão");
    assert_eq!(table.rows[1].value, "R$ 249.90");
  }

  #[test]
  fn row_limit_is_clamped_to_filtered_rows() {
    let mut dash = InventoryDashboard::new(rows());
    dash.apply(InventoryEvent::ShowTable(true));
    dash.apply(InventoryEvent::TableCategory(CategoryChoice::All));
    dash.apply(InventoryEvent::RowLimit(5));
    assert_eq!(dash.snapshot().table.as_ref().unwrap().rows.len(), 5);

    dash.apply(InventoryEvent::TableCategory(CategoryChoice::Only("Laticínios".into())));
    let table = dash.snapshot().table.clone().unwrap();
    assert_eq!(table.row_limit, 2);
    assert_eq!(table.rows.len(), 2);

    dash.apply(InventoryEvent::RowLimit(0));
    assert_eq!(dash.snapshot().table.as_ref().unwrap().row_limit, 1);
  }

  #[test]
  fn hiding_the_table_drops_it() {
    let mut dash = InventoryDashboard::new(rows());
    dash.apply(InventoryEvent::ShowTable(true));
    assert!(dash.snapshot().table.is_some());
    dash.apply(InventoryEvent::ShowTable(false));
    assert!(dash.snapshot().table.is_none());
  }

  #[test]
  fn empty_file_has_no_chart() {
    let mut dash = InventoryDashboard::new(Arc::new(Vec::new()));
    assert!(dash.snapshot().chart.is_none());
    dash.apply(InventoryEvent::ShowTable(true));
    let table = dash.snapshot().table.clone().unwrap();
    assert_eq!(table.category, CategoryChoice::All);
    assert_eq!(table.row_limit, 0);
    assert!(table.rows.is_empty());
  }
}
